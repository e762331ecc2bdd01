//! Composition root for the demo binary.
//!
//! This module wires the library pieces together the way a game would at
//! startup: services are constructed and registered explicitly, panels bind
//! themselves to the bus, gameplay listeners are installed.

pub mod bootstrap;
pub mod panels;
pub mod services;

pub use bootstrap::{bootstrap, run_demo};
