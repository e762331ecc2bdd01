//! JSON configuration file.
//!
//! The file location comes from `$NIGHTWIRE_CONFIG`. A missing variable or
//! a missing file is not an error: defaults apply. A malformed file is
//! reported with a warning and defaults apply too, so a bad config never
//! keeps the game from booting.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::constants::CONFIG_PATH_ENV;
use super::settings::NightwireConfig;
use crate::error::ConfigError;

/// Config file path from the environment, if set and non-empty.
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

impl NightwireConfig {
    /// Parse a config from JSON text.
    pub fn from_json(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let mut config: NightwireConfig =
            serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate();
        Ok(config)
    }

    /// Load a config file, surfacing every failure.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &contents)
    }

    /// Load the config named by `$NIGHTWIRE_CONFIG`, falling back to defaults.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Load a config file, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                warn!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> String {
        // Plain structs of bools and integers always serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
