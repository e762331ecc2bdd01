//! UI routing on top of the event bus.
//!
//! Callers ask for "open/close/toggle panel type `P`"; panels listen for
//! those requests on the bus and decide how to show or hide themselves.
//! Neither side holds a reference to the other.
//!
//! ## Module Structure
//! - [`events`]: `OpenUi<P>`, `CloseUi<P>`, `ToggleUi<P>` payloads
//! - [`panel`]: `Panel` contract, `PanelState` machine, `PanelBinding`
//! - [`manager`]: `UiManager` and its open-panel tracking
//! - [`chain`]: `UiChain`, deferred batches of operations
//! - [`global`]: process-wide manager

pub mod chain;
pub mod events;
pub mod global;
pub mod manager;
pub mod panel;

pub use chain::UiChain;
pub use events::{CloseUi, OpenUi, ToggleUi, UiAction, UiEvent, UiKind};
pub use global::manager;
pub use manager::UiManager;
pub use panel::{Panel, PanelBinding, PanelState, PanelVisibility};
