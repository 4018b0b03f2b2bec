//! Trainer Configuration

use crate::TrainerError;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storage::StoreConfig;

/// Default configuration file, relative to the working directory
const DEFAULT_CONFIG: &str = "config/default.toml";

/// Split and optimizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Share of each class held out for evaluation
    pub test_fraction: f64,
    /// Seed for the stratified shuffle
    pub seed: u64,
    /// Inverse L2 regularization strength (C)
    pub regularization: f64,
    pub max_iterations: usize,
    /// Gradient max-norm at which the optimizer stops
    pub tolerance: f64,
    /// Columns left out of the reporting model
    pub exclude_columns: Vec<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.3,
            seed: 42,
            regularization: 1.0,
            max_iterations: 500,
            tolerance: 1e-4,
            exclude_columns: vec![
                "arrival_date".to_string(),
                "reservation_status".to_string(),
                "reservation_status_date".to_string(),
            ],
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<(), TrainerError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(TrainerError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if !(self.regularization > 0.0 && self.regularization.is_finite()) {
            return Err(TrainerError::InvalidConfig(format!(
                "regularization must be positive, got {}",
                self.regularization
            )));
        }
        if self.max_iterations == 0 {
            return Err(TrainerError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(TrainerError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Dataset location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/clean_hotel_bookings.csv"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// "json" or "pretty"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Everything the `train-models` job reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainJobConfig {
    pub data: DataConfig,
    pub models: StoreConfig,
    pub training: TrainerConfig,
    pub logging: LoggingConfig,
}

impl TrainJobConfig {
    /// Load from `path` (or the default file when present), then `HOTEL__*` env overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG)).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("HOTEL").separator("__"))
            .build()?
            .try_deserialize()
    }
}
