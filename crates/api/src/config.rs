//! Server Configuration

use config::{Config, ConfigError, Environment, File};
use inference_engine::InferenceConfig;
use reporting::ReportStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storage::StoreConfig;

/// Default configuration file, relative to the working directory
const DEFAULT_CONFIG: &str = "config/default.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub models: StoreConfig,
    pub inference: InferenceConfig,
    pub logging: LoggingConfig,
    pub style: ReportStyle,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8050".to_string(),
        }
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

impl AppConfig {
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
