//! Service registry.
//!
//! Shared singletons (audio, scene loading, game time, …) are looked up by
//! type instead of being passed around. A bootstrap routine constructs each
//! service and registers it explicitly; nothing registers itself.
//!
//! # Module Structure
//!
//! - [`locator`]: `ServiceLocator`, `ServiceKey`, `Capabilities`
//! - [`readiness`]: `Readiness`, waits for a set of services to appear
//! - [`global`]: process-wide locator and free functions

pub mod global;
pub mod locator;
pub mod readiness;

pub use global::locator;
pub use locator::{Capabilities, ListenerId, RegistrationListener, ServiceKey, ServiceLocator};
pub use readiness::Readiness;
