//! Gameplay event handlers.
//!
//! Listeners that react to gameplay events on the bus. They are installed
//! by the bootstrap routine and live as long as the returned guard.

pub mod gameplay;

pub use gameplay::{install, DamagedEvent, GameplayListeners, Sanity, ServiceRegistered};
