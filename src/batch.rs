//! Parallel runs over independent datasets.
//!
//! Every dataset gets its own simulation on the rayon pool; nothing is shared
//! between them, and a failure is reported for its dataset only.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::DispatchConfig;
use crate::input::{read_problem, ParseError};
use crate::output::write_solution;
use crate::solver::solve;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("{}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{}: cannot write solution: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{}: {} is already written by an earlier input with the same name",
        .path.display(),
        .output.display()
    )]
    DuplicateOutput { path: PathBuf, output: PathBuf },
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub name: String,
    pub output: PathBuf,
    pub score: i64,
    pub rides_served: usize,
    pub rides_total: usize,
    pub elapsed: Duration,
}

pub type DatasetOutcome = Result<DatasetReport, BatchError>;

/// Solves every input in parallel and writes `<stem>.out` into `out_dir`.
/// Outcomes are returned in input order. When two inputs share a stem only
/// the first is solved; the others fail with [`BatchError::DuplicateOutput`].
pub fn run_batch(inputs: &[PathBuf], out_dir: &Path, config: &DispatchConfig) -> Vec<DatasetOutcome> {
    let mut claimed = HashSet::new();
    let repeated: Vec<bool> = inputs
        .iter()
        .map(|input| !claimed.insert(dataset_name(input)))
        .collect();

    inputs
        .par_iter()
        .zip(repeated.par_iter())
        .map(|(input, &repeated)| {
            if repeated {
                let output = out_dir.join(format!("{}.out", dataset_name(input)));
                error!(path = %input.display(), "output name already taken");
                return Err(BatchError::DuplicateOutput {
                    path: input.to_path_buf(),
                    output,
                });
            }
            run_dataset(input, out_dir, config)
        })
        .collect()
}

/// Solves one input file and writes its solution.
pub fn run_dataset(input: &Path, out_dir: &Path, config: &DispatchConfig) -> DatasetOutcome {
    let started = Instant::now();
    let name = dataset_name(input);

    let problem = read_problem(input).map_err(|source| {
        error!(dataset = %name, %source, "input rejected");
        BatchError::Input {
            path: input.to_path_buf(),
            source,
        }
    })?;

    info!(dataset = %name, vehicles = problem.vehicles, rides = problem.rides.len(), "solving");
    let result = solve(&problem, config);

    let output = out_dir.join(format!("{name}.out"));
    fs::create_dir_all(out_dir)
        .and_then(|_| write_solution(&output, &result))
        .map_err(|source| BatchError::Output {
            path: output.clone(),
            source,
        })?;

    let report = DatasetReport {
        name,
        output,
        score: result.total_score,
        rides_served: result.rides_served(),
        rides_total: problem.rides.len(),
        elapsed: started.elapsed(),
    };
    info!(
        dataset = %report.name,
        score = report.score,
        served = report.rides_served,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "written to {}",
        report.output.display()
    );
    Ok(report)
}

fn dataset_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("dataset")
        .to_string()
}
