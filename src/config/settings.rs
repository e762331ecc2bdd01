//! Configuration structures (pure Rust, no I/O).
//!
//! These are deserialized from the JSON config file. Every field has a
//! default so a partial file, or no file at all, is valid.

use serde::{Deserialize, Serialize};

use super::constants::*;

/// Settings for the bus introspection layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Collect publish counters and history at all?
    pub enabled: bool,
    /// Number of recent publishes kept. 0 keeps counters but no history.
    pub history_capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_DIAGNOSTICS_ENABLED,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Settings for the service registry's developer warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub warn_on_missing: bool,
    pub warn_on_overwrite: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            warn_on_missing: DEFAULT_WARN_ON_MISSING,
            warn_on_overwrite: DEFAULT_WARN_ON_OVERWRITE,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightwireConfig {
    pub diagnostics: DiagnosticsConfig,
    pub services: ServiceConfig,
}

impl NightwireConfig {
    /// Clamps values to their valid ranges.
    pub fn validate(&mut self) {
        self.diagnostics.history_capacity =
            self.diagnostics.history_capacity.min(MAX_HISTORY_CAPACITY);
    }

    /// Returns a config with diagnostics turned off entirely.
    pub fn quiet() -> Self {
        Self {
            diagnostics: DiagnosticsConfig {
                enabled: false,
                history_capacity: 0,
            },
            services: ServiceConfig {
                warn_on_missing: false,
                warn_on_overwrite: false,
            },
        }
    }
}
