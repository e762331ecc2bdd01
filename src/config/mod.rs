//! Runtime configuration.
//!
//! Pure data describing how the bus diagnostics and the service registry
//! behave, plus the JSON loader used at startup.
//!
//! The process-wide bus and locator read the config once, on first use.

pub mod constants;
pub mod file;
pub mod settings;

pub use constants::*;
pub use settings::{DiagnosticsConfig, NightwireConfig, ServiceConfig};

use once_cell::sync::Lazy;

static PROCESS_CONFIG: Lazy<NightwireConfig> = Lazy::new(NightwireConfig::load);

/// Config shared by the process-wide bus and locator, loaded on first use.
pub fn process_config() -> &'static NightwireConfig {
    &PROCESS_CONFIG
}
