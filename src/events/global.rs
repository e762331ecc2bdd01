//! Process-wide access to the event bus.
//!
//! Gameplay code that has no handle to a bus uses these free functions.
//! The bus is created on first use with the diagnostics settings from the
//! process config (see [`crate::config::process_config`]).
//!
//! # Example
//!
//! ```
//! use nightwire::events;
//!
//! struct LightsOut;
//!
//! let h = events::subscribe_fn(|_: &LightsOut| {});
//! events::publish(LightsOut);
//! events::unsubscribe(&h);
//! ```

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::bus::{EventBus, Handler};
use super::diagnostics::BusSnapshot;
use crate::config::process_config;

static BUS: Lazy<Arc<EventBus>> =
    Lazy::new(|| Arc::new(EventBus::with_config(&process_config().diagnostics)));

/// Shared handle to the process-wide bus.
pub fn bus() -> Arc<EventBus> {
    Arc::clone(&BUS)
}

pub fn subscribe<T: 'static>(handler: &Handler<T>) {
    BUS.subscribe(handler);
}

pub fn subscribe_fn<T, F>(f: F) -> Handler<T>
where
    T: 'static,
    F: Fn(&T) + Send + Sync + 'static,
{
    BUS.subscribe_fn(f)
}

pub fn unsubscribe<T: 'static>(handler: &Handler<T>) {
    BUS.unsubscribe(handler);
}

/// Publish on the process-wide bus.
pub fn publish<T: 'static>(event: T) {
    BUS.publish(event);
}

/// Drop every subscription on the process-wide bus.
///
/// Meant for hard resets. Every subscriber in the process loses its
/// subscription, so tests sharing the process should prefer their own
/// `EventBus` instances.
pub fn clear_all() {
    BUS.clear_all();
}

pub fn snapshot() -> BusSnapshot {
    BUS.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Payload types private to this module so parallel tests sharing the
    // global bus never see each other's events.
    struct GlobalPing;
    struct GlobalOnlyHere;

    #[test]
    fn test_global_publish_reaches_subscriber() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let h = subscribe_fn(move |_: &GlobalPing| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        publish(GlobalPing);
        unsubscribe(&h);
        publish(GlobalPing);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bus_handle_is_shared() {
        let h = subscribe_fn(|_: &GlobalOnlyHere| {});
        assert_eq!(bus().subscriber_count::<GlobalOnlyHere>(), 1);
        unsubscribe(&h);
        assert_eq!(bus().subscriber_count::<GlobalOnlyHere>(), 0);
    }
}
