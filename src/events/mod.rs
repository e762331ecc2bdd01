//! Event system for decoupled communication between game systems.
//!
//! A typed, synchronous publish/subscribe bus. Any `'static` type can be a
//! payload; no marker trait or registration is needed.
//!
//! - **Decoupled architecture**: publishers never know who listens
//! - **Thread safety**: subscribe/unsubscribe/publish work from any thread
//! - **Synchronous delivery**: `publish()` returns after every handler ran
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Combat    │     │   Sanity    │     │  UiManager  │
//! └──────┬──────┘     └──────┬──────┘     └──────┬──────┘
//!        │ publish(T)        │ publish(T)        │ publish(OpenUi<P>)
//!        ▼                   ▼                   ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                     EventBus                        │
//! │          TypeId → [Handler<T>, Handler<T>, …]       │
//! └─────────────────────────┬───────────────────────────┘
//!                           │ inline, in subscription order
//!                           ▼
//!              handlers (audio, HUD, panels, …)
//! ```
//!
//! # Module Structure
//!
//! - [`bus`]: `EventBus` and the `Handler<T>` type
//! - [`diagnostics`]: publish counters and recent-publish history
//! - [`global`]: process-wide bus and free functions

pub mod bus;
pub mod diagnostics;
pub mod global;

pub use bus::{handler, EventBus, Handler};
pub use diagnostics::{BusSnapshot, PublishRecord};
pub use global::{bus, clear_all, publish, snapshot, subscribe, subscribe_fn, unsubscribe};
