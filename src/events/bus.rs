//! Typed, synchronous publish/subscribe dispatcher.
//!
//! The bus keeps one channel per payload type, keyed by `TypeId`:
//! - Subscribers are `Handler<T>` values (`Arc<dyn Fn(&T)>`), invoked in
//!   subscription order
//! - `publish()` runs every handler inline before it returns
//! - Channels are created on first subscribe and dropped when empty
//!
//! Channels are disjoint: a handler for `A` never sees a `B`, whatever the
//! relationship between the two types.
//!
//! # Re-entrancy
//!
//! `publish()` copies the handler list and releases the table lock before
//! invoking anything. Handlers may subscribe, unsubscribe or publish freely;
//! structural changes apply to the next publish, never the one in flight.
//!
//! # Handler panics
//!
//! A panicking handler aborts the rest of that publish and the panic
//! propagates to the publisher. The table is never locked while handlers run
//! and `parking_lot` locks do not poison, so the bus stays fully usable.
//!
//! # Example
//!
//! ```
//! use nightwire::events::{handler, EventBus};
//!
//! struct Damaged { amount: u32 }
//!
//! let bus = EventBus::new();
//! let log = handler(|event: &Damaged| assert_eq!(event.amount, 10));
//!
//! bus.subscribe(&log);
//! bus.publish(Damaged { amount: 10 });
//! bus.unsubscribe(&log);
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::diagnostics::{BusSnapshot, Diagnostics, PublishRecord};
use crate::config::DiagnosticsConfig;

/// A subscriber callback for payload type `T`.
///
/// Identity is the allocation: unsubscribing needs a clone of the same
/// `Arc` that was subscribed.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Wrap a closure into a `Handler<T>`.
pub fn handler<T, F>(f: F) -> Handler<T>
where
    T: 'static,
    F: Fn(&T) + Send + Sync + 'static,
{
    Arc::new(f)
}

fn same_handler<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Type-erased view of a `Channel<T>` so one map can hold every payload type.
trait AnyChannel: Send + Sync {
    fn len(&self) -> usize;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Channel<T: 'static> {
    handlers: Vec<Handler<T>>,
}

impl<T: 'static> AnyChannel for Channel<T> {
    fn len(&self) -> usize {
        self.handlers.len()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Thread-safe typed event bus.
///
/// One `Mutex` guards the dispatch table; a second one guards diagnostics.
/// Neither is held while handlers run.
pub struct EventBus {
    channels: Mutex<HashMap<TypeId, Box<dyn AnyChannel>>>,
    diagnostics: Mutex<Diagnostics>,
}

impl EventBus {
    /// Create a bus with default diagnostics settings.
    pub fn new() -> Self {
        Self::with_config(&DiagnosticsConfig::default())
    }

    pub fn with_config(config: &DiagnosticsConfig) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            diagnostics: Mutex::new(Diagnostics::new(config)),
        }
    }

    /// Add `handler` to the channel for `T`.
    ///
    /// Not idempotent: subscribing the same handler twice makes it fire
    /// twice per publish.
    pub fn subscribe<T: 'static>(&self, handler: &Handler<T>) {
        let mut channels = self.channels.lock();
        let channel = channels.entry(TypeId::of::<T>()).or_insert_with(|| {
            Box::new(Channel::<T> {
                handlers: Vec::new(),
            }) as Box<dyn AnyChannel>
        });

        // The key is TypeId::of::<T>(), so the downcast cannot fail.
        if let Some(channel) = channel.as_any_mut().downcast_mut::<Channel<T>>() {
            channel.handlers.push(Arc::clone(handler));
            debug!(
                "Subscribed to {} ({} handler(s))",
                type_name::<T>(),
                channel.handlers.len()
            );
        }
    }

    /// Closure shorthand for `subscribe`. Keep the returned handler to
    /// unsubscribe later.
    pub fn subscribe_fn<T, F>(&self, f: F) -> Handler<T>
    where
        T: 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let h = handler(f);
        self.subscribe(&h);
        h
    }

    /// Remove one occurrence of `handler` from the channel for `T`.
    ///
    /// The most recently added occurrence goes first. Unknown handlers and
    /// unknown types are ignored. An emptied channel is dropped.
    pub fn unsubscribe<T: 'static>(&self, handler: &Handler<T>) {
        let key = TypeId::of::<T>();
        let mut channels = self.channels.lock();

        let now_empty = match channels
            .get_mut(&key)
            .and_then(|c| c.as_any_mut().downcast_mut::<Channel<T>>())
        {
            Some(channel) => {
                if let Some(pos) = channel
                    .handlers
                    .iter()
                    .rposition(|h| same_handler(h, handler))
                {
                    channel.handlers.remove(pos);
                    debug!("Unsubscribed from {}", type_name::<T>());
                }
                channel.handlers.is_empty()
            }
            None => false,
        };

        if now_empty {
            channels.remove(&key);
        }
    }

    /// Deliver `event` to every handler currently subscribed to `T`.
    ///
    /// Handlers run synchronously, in subscription order, on the calling
    /// thread. With no subscribers this does nothing.
    pub fn publish<T: 'static>(&self, event: T) {
        let key = TypeId::of::<T>();
        let snapshot: Vec<Handler<T>> = {
            let channels = self.channels.lock();
            channels
                .get(&key)
                .and_then(|c| c.as_any().downcast_ref::<Channel<T>>())
                .map(|c| c.handlers.clone())
                .unwrap_or_default()
        };

        self.diagnostics
            .lock()
            .record(key, type_name::<T>(), snapshot.len());
        trace!(
            "Publishing {} to {} handler(s)",
            type_name::<T>(),
            snapshot.len()
        );

        for h in &snapshot {
            h(&event);
        }
    }

    /// Drop every subscription on every channel.
    ///
    /// Subscribers are not notified and must subscribe again.
    pub fn clear_all(&self) {
        let removed = {
            let mut channels = self.channels.lock();
            let count = channels.len();
            channels.clear();
            count
        };
        debug!("Cleared {} channel(s)", removed);
    }

    /// Number of handlers currently subscribed to `T`.
    pub fn subscriber_count<T: 'static>(&self) -> usize {
        self.channels
            .lock()
            .get(&TypeId::of::<T>())
            .map_or(0, |c| c.len())
    }

    pub fn has_subscribers<T: 'static>(&self) -> bool {
        self.subscriber_count::<T>() > 0
    }

    /// Number of live (non-empty) channels.
    pub fn channel_count(&self) -> usize {
        self.channels.lock().len()
    }

    /// How many times `T` has been published (0 with diagnostics disabled).
    pub fn publish_count<T: 'static>(&self) -> u64 {
        self.diagnostics.lock().publish_count(TypeId::of::<T>())
    }

    /// Recent publishes, oldest first.
    pub fn recent_publishes(&self) -> Vec<PublishRecord> {
        self.diagnostics.lock().history()
    }

    pub fn snapshot(&self) -> BusSnapshot {
        let subscriber_counts = self
            .channels
            .lock()
            .values()
            .map(|c| (c.type_name(), c.len()))
            .collect();
        let diagnostics = self.diagnostics.lock();
        BusSnapshot {
            subscriber_counts,
            publish_counts: diagnostics.publish_counts(),
            recent: diagnostics.history(),
        }
    }

    pub fn reset_diagnostics(&self) {
        self.diagnostics.lock().reset();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("channels", &self.channel_count())
            .finish()
    }
}
