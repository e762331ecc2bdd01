//! Error types.
//!
//! The bus and the UI layer never fail: absence is a normal state there.
//! Errors only come out of config loading and out of the strict service
//! lookup (`ServiceLocator::require`).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the JSON config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid config JSON.
    #[error("Parse error in config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by strict service lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Service not registered: {key}")]
    NotRegistered { key: &'static str },
}
