//! Settings-level errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read config: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment override failed: {0}")]
    Environment(#[from] config::ConfigError),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Result type for settings loading.
pub type SettingsResult<T> = Result<T, SettingsError>;
