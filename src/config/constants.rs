//! Configuration constants and default values.
//!
//! This module contains the defaults for every `NightwireConfig` field,
//! the environment variable used to locate the config file, and the
//! validation limits applied on load.

// === Diagnostics Defaults ===

/// Diagnostics are collected unless the config turns them off.
pub const DEFAULT_DIAGNOSTICS_ENABLED: bool = true;

/// Default number of recent publishes kept in the history ring.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Upper bound for the history ring. Larger values are clamped.
pub const MAX_HISTORY_CAPACITY: usize = 4096;

// === Service Registry Defaults ===

/// Log a warning when `get` misses.
pub const DEFAULT_WARN_ON_MISSING: bool = true;

/// Log a warning when a registration replaces an existing instance.
pub const DEFAULT_WARN_ON_OVERWRITE: bool = true;

// === Environment ===

/// Environment variable holding the path of the JSON config file.
pub const CONFIG_PATH_ENV: &str = "NIGHTWIRE_CONFIG";
