//! Decoupling core for gameplay code: a typed event bus, a typed service
//! registry and a UI routing layer built on the bus.
//!
//! Everything here is engine-independent and free of I/O apart from the
//! optional config file, so the whole crate runs as normal unit and
//! integration tests.
//!
//! - [`events`]: publish/subscribe by payload type
//! - [`services`]: one shared instance per service type
//! - [`ui`]: open/close/toggle panels by type
//! - [`config`]: diagnostics and warning settings

pub mod config;
pub mod error;
pub mod events;
pub mod services;
pub mod ui;

// Re-export the types most callers need
pub use config::NightwireConfig;
pub use error::{ConfigError, ServiceError};
pub use events::{handler, EventBus, Handler};
pub use services::{Readiness, ServiceKey, ServiceLocator};
pub use ui::{CloseUi, OpenUi, Panel, PanelBinding, ToggleUi, UiManager};
