//! Command-line front end: solve datasets or score an existing solution.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ride_dispatch::batch::run_batch;
use ride_dispatch::config::{DispatchConfig, NearSplit, Strategy};
use ride_dispatch::input::read_problem;
use ride_dispatch::output::{evaluate, read_solution};

#[derive(Debug, Parser)]
#[command(name = "dispatch", about = "Greedy time-stepped ride dispatcher")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve one or more datasets in parallel.
    Run(RunArgs),
    /// Score a solution file against its dataset.
    Score {
        input: PathBuf,
        solution: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Near/far split: a fraction in [0, 1] or `random`.
    #[arg(long)]
    near_split: Option<SplitArg>,

    /// Fraction of the horizon beyond which wait + approach is penalized.
    #[arg(long)]
    far_threshold: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Couple,
    Greedy,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Couple => Strategy::Couple,
            StrategyArg::Greedy => Strategy::Greedy,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitArg(NearSplit);

impl FromStr for SplitArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("random") {
            return Ok(SplitArg(NearSplit::Random));
        }
        s.parse::<f64>()
            .map(|fraction| SplitArg(NearSplit::Fraction(fraction)))
            .map_err(|_| format!("expected a fraction or `random`, got `{s}`"))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Run(args) => run(args),
        Command::Score { input, solution } => score(&input, &solution),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &RunArgs) -> Result<DispatchConfig> {
    let mut config = match &args.config {
        Some(path) => DispatchConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DispatchConfig::default(),
    };

    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if let Some(SplitArg(split)) = args.near_split {
        config.near_split = split;
    }
    if let Some(fraction) = args.far_threshold {
        config.far_threshold_fraction = fraction;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(args: RunArgs) -> Result<ExitCode> {
    let config = build_config(&args)?;
    info!(?config, datasets = args.inputs.len(), "starting batch");

    let outcomes = run_batch(&args.inputs, &args.out_dir, &config);

    let mut total = 0;
    let mut failed = 0;
    for outcome in &outcomes {
        match outcome {
            Ok(report) => {
                total += report.score;
                println!(
                    "{}: score {} ({}/{} rides) in {:.2}s",
                    report.name,
                    report.score,
                    report.rides_served,
                    report.rides_total,
                    report.elapsed.as_secs_f64()
                );
            }
            Err(err) => {
                failed += 1;
                error!("{err}");
            }
        }
    }
    println!("total score: {total}");

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn score(input: &Path, solution_path: &Path) -> Result<ExitCode> {
    let problem = read_problem(input).with_context(|| format!("reading {}", input.display()))?;
    let solution = read_solution(solution_path)
        .with_context(|| format!("reading {}", solution_path.display()))?;
    let report = evaluate(&problem, &solution).context("scoring solution")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}
