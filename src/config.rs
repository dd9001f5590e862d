//! Dispatcher configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Time;

/// How an idle vehicle picks a ride from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Pairwise comparison of rides with one ride of lookahead.
    #[default]
    Couple,
    /// Highest single-pairing score.
    Greedy,
}

/// Where the near/far boundary falls among candidates sorted by approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NearSplit {
    /// `floor(n * fraction)` candidates are near.
    Fraction(f64),
    /// Uniform in `1..=n`, drawn per selection.
    Random,
}

impl Default for NearSplit {
    fn default() -> Self {
        NearSplit::Fraction(0.4)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub strategy: Strategy,
    pub near_split: NearSplit,
    /// Fraction of the horizon beyond which `wait + approach` is penalized.
    pub far_threshold_fraction: f64,
    /// Seed for the random near/far split.
    pub seed: u64,
    /// Steps between progress log lines; 0 disables them.
    pub progress_interval: Time,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            near_split: NearSplit::default(),
            far_threshold_fraction: 0.5,
            seed: 42,
            progress_interval: 1000,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a fraction in [0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("progress_interval must not be negative, got {0}")]
    NegativeInterval(Time),

    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatchConfig {
    /// Loads a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: DispatchConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("far_threshold_fraction", self.far_threshold_fraction)?;
        if let NearSplit::Fraction(fraction) = self.near_split {
            check_fraction("near_split_fraction", fraction)?;
        }
        if self.progress_interval < 0 {
            return Err(ConfigError::NegativeInterval(self.progress_interval));
        }
        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { name, value })
    }
}
