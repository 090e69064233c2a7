//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// No platform config directory to place the settings file in.
    #[error("Cannot locate a configuration directory for the settings file")]
    NoConfigDir,

    /// Reading or writing the settings file failed.
    #[error("Settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document could not be rendered as TOML.
    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
