//! Typed singleton registry.
//!
//! One instance per service key. The key is the type named at registration,
//! which may be a trait object (`dyn AudioService`) rather than the concrete
//! type, so consumers depend on the interface only.
//!
//! - Re-registering a key replaces the old instance and logs a warning
//! - `get()` on a missing key returns `None` and logs a warning
//! - Every registration notifies the listeners added with `on_registered()`
//!
//! Instances can also declare extra capabilities at registration time (see
//! [`Capabilities`]); `get_all::<C>()` then finds every instance providing
//! `C`, whatever key it was registered under.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nightwire::services::ServiceLocator;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> f64;
//! }
//!
//! struct FixedClock;
//! impl Clock for FixedClock {
//!     fn now(&self) -> f64 { 12.0 }
//! }
//!
//! let locator = ServiceLocator::new();
//! locator.register::<dyn Clock>(Arc::new(FixedClock));
//!
//! let clock = locator.get::<dyn Clock>().expect("registered above");
//! assert_eq!(clock.now(), 12.0);
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Runtime identity of a service or capability type.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey {
    id: TypeId,
    name: &'static str,
}

impl ServiceKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name, for logs only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Boxed `Arc<T>`; `T` may be unsized, so the `Arc` itself is what we erase.
type ErasedArc = Box<dyn Any + Send + Sync>;

/// Extra interfaces an instance provides besides its registration key.
///
/// Each view is the same instance coerced to the capability type:
///
/// ```
/// use std::sync::Arc;
/// use nightwire::services::{Capabilities, ServiceLocator};
///
/// trait Resettable: Send + Sync { fn reset(&self); }
///
/// struct Audio;
/// impl Resettable for Audio { fn reset(&self) {} }
///
/// let audio = Arc::new(Audio);
/// let locator = ServiceLocator::new();
/// locator.register_with(
///     Arc::clone(&audio),
///     Capabilities::new().with::<dyn Resettable>(audio),
/// );
/// assert_eq!(locator.get_all::<dyn Resettable>().len(), 1);
/// ```
#[derive(Default)]
pub struct Capabilities {
    views: Vec<(ServiceKey, ErasedArc)>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<C: ?Sized + Send + Sync + 'static>(mut self, view: Arc<C>) -> Self {
        self.views.push((ServiceKey::of::<C>(), Box::new(view)));
        self
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

struct Entry {
    key: ServiceKey,
    instance: ErasedArc,
    capabilities: Vec<(ServiceKey, ErasedArc)>,
    /// Registration order, used to keep `get_all`/`keys` deterministic.
    sequence: u64,
}

/// Callback invoked after each registration with the registered key.
pub type RegistrationListener = Arc<dyn Fn(&ServiceKey) + Send + Sync>;

/// Handle returned by `on_registered`, used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    entries: HashMap<TypeId, Entry>,
    next_sequence: u64,
}

#[derive(Default)]
struct Listeners {
    list: Vec<(ListenerId, RegistrationListener)>,
    next_id: u64,
}

/// Thread-safe service registry.
pub struct ServiceLocator {
    registry: RwLock<Registry>,
    listeners: Mutex<Listeners>,
    config: ServiceConfig,
}

impl ServiceLocator {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            listeners: Mutex::new(Listeners::default()),
            config,
        }
    }

    /// Store `instance` under key `T`, replacing any previous instance.
    pub fn register<T: ?Sized + Send + Sync + 'static>(&self, instance: Arc<T>) {
        self.register_with(instance, Capabilities::new());
    }

    /// Store `instance` under key `T` together with extra capability views.
    ///
    /// Replacing a key also drops the capabilities declared by the old
    /// instance.
    pub fn register_with<T: ?Sized + Send + Sync + 'static>(
        &self,
        instance: Arc<T>,
        capabilities: Capabilities,
    ) {
        let key = ServiceKey::of::<T>();
        let replaced = {
            let mut registry = self.registry.write();
            let sequence = registry.next_sequence;
            registry.next_sequence += 1;
            registry
                .entries
                .insert(
                    key.id,
                    Entry {
                        key,
                        instance: Box::new(instance),
                        capabilities: capabilities.views,
                        sequence,
                    },
                )
                .is_some()
        };

        if replaced && self.config.warn_on_overwrite {
            warn!(
                "Service {} was already registered, replacing the previous instance",
                key
            );
        } else {
            debug!("Registered service {}", key);
        }

        self.notify(&key);
    }

    /// Current instance for key `T`, or `None` if nothing is registered.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let found = self.lookup::<T>();
        if found.is_none() && self.config.warn_on_missing {
            warn!("Service {} not found", type_name::<T>());
        }
        found
    }

    /// Like `get`, but absence is an error for callers that propagate with `?`.
    pub fn require<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, ServiceError> {
        self.lookup::<T>().ok_or(ServiceError::NotRegistered {
            key: type_name::<T>(),
        })
    }

    /// Every instance providing `C`: registered under key `C` or declaring
    /// `C` as a capability. Registration order; empty when nothing matches.
    pub fn get_all<C: ?Sized + Send + Sync + 'static>(&self) -> Vec<Arc<C>> {
        let wanted = TypeId::of::<C>();
        let registry = self.registry.read();

        let mut matches: Vec<(u64, Arc<C>)> = Vec::new();
        for entry in registry.entries.values() {
            if entry.key.id == wanted {
                if let Some(instance) = entry.instance.downcast_ref::<Arc<C>>() {
                    matches.push((entry.sequence, Arc::clone(instance)));
                }
            }
            for (cap_key, view) in &entry.capabilities {
                if cap_key.id == wanted {
                    if let Some(view) = view.downcast_ref::<Arc<C>>() {
                        matches.push((entry.sequence, Arc::clone(view)));
                    }
                }
            }
        }

        matches.sort_by_key(|(sequence, _)| *sequence);
        matches.into_iter().map(|(_, instance)| instance).collect()
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_key(&ServiceKey::of::<T>())
    }

    pub fn contains_key(&self, key: &ServiceKey) -> bool {
        self.registry.read().entries.contains_key(&key.id)
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> Vec<ServiceKey> {
        let registry = self.registry.read();
        let mut entries: Vec<&Entry> = registry.entries.values().collect();
        entries.sort_by_key(|e| e.sequence);
        entries.into_iter().map(|e| e.key).collect()
    }

    pub fn len(&self) -> usize {
        self.registry.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every registration. Listeners stay attached.
    pub fn clear(&self) {
        self.registry.write().entries.clear();
        debug!("Cleared service registry");
    }

    /// Call `listener` after every future registration.
    pub fn on_registered<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ServiceKey) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.list.push((id, Arc::new(listener)));
        id
    }

    /// Returns false if the listener was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.list.len();
        listeners.list.retain(|(existing, _)| *existing != id);
        listeners.list.len() != before
    }

    fn lookup<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.registry
            .read()
            .entries
            .get(&TypeId::of::<T>())
            .and_then(|e| e.instance.downcast_ref::<Arc<T>>())
            .cloned()
    }

    fn notify(&self, key: &ServiceKey) {
        // Listeners may register services themselves, so run them unlocked.
        let snapshot: Vec<RegistrationListener> = self
            .listeners
            .lock()
            .list
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(key);
        }
    }
}

impl Default for ServiceLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> = self.keys().iter().map(|k| k.name()).collect();
        f.debug_struct("ServiceLocator")
            .field("services", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Audio: Send + Sync {
        fn volume(&self) -> u8;
    }

    trait Tickable: Send + Sync {
        fn tick(&self) -> &'static str;
    }

    #[derive(Debug)]
    struct Mixer(u8);

    impl Audio for Mixer {
        fn volume(&self) -> u8 {
            self.0
        }
    }

    impl Tickable for Mixer {
        fn tick(&self) -> &'static str {
            "mixer"
        }
    }

    struct Clock;

    impl Tickable for Clock {
        fn tick(&self) -> &'static str {
            "clock"
        }
    }

    #[test]
    fn test_register_and_get_concrete() {
        let locator = ServiceLocator::new();
        let mixer = Arc::new(Mixer(3));
        locator.register(Arc::clone(&mixer));

        let found = locator.get::<Mixer>().unwrap();
        assert!(Arc::ptr_eq(&found, &mixer));
    }

    #[test]
    fn test_register_under_interface_key() {
        let locator = ServiceLocator::new();
        locator.register::<dyn Audio>(Arc::new(Mixer(7)));

        assert_eq!(locator.get::<dyn Audio>().unwrap().volume(), 7);
        assert!(locator.get::<Mixer>().is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let locator = ServiceLocator::new();
        locator.register(Arc::new(Mixer(1)));
        locator.register(Arc::new(Mixer(2)));

        assert_eq!(locator.get::<Mixer>().unwrap().0, 2);
        assert_eq!(locator.len(), 1);
    }

    #[test]
    fn test_missing_service_is_none() {
        let locator = ServiceLocator::new();
        assert!(locator.get::<Mixer>().is_none());
        assert_eq!(
            locator.require::<Mixer>().unwrap_err(),
            ServiceError::NotRegistered {
                key: type_name::<Mixer>()
            }
        );
    }

    #[test]
    fn test_get_all_matches_key_and_capabilities_in_order() {
        let locator = ServiceLocator::new();
        let mixer = Arc::new(Mixer(1));
        locator.register_with(
            Arc::clone(&mixer),
            Capabilities::new().with::<dyn Tickable>(mixer),
        );
        locator.register::<dyn Tickable>(Arc::new(Clock));

        let ticks: Vec<&str> = locator
            .get_all::<dyn Tickable>()
            .iter()
            .map(|t| t.tick())
            .collect();
        assert_eq!(ticks, vec!["mixer", "clock"]);
    }

    #[test]
    fn test_get_all_empty_when_nothing_matches() {
        let locator = ServiceLocator::new();
        locator.register(Arc::new(Mixer(1)));
        assert!(locator.get_all::<dyn Tickable>().is_empty());
    }

    #[test]
    fn test_overwrite_drops_old_capabilities() {
        let locator = ServiceLocator::new();
        let mixer = Arc::new(Mixer(1));
        locator.register_with(
            Arc::clone(&mixer),
            Capabilities::new().with::<dyn Tickable>(mixer),
        );
        locator.register(Arc::new(Mixer(2)));

        assert!(locator.get_all::<dyn Tickable>().is_empty());
    }

    #[test]
    fn test_listeners_receive_registered_key() {
        let locator = ServiceLocator::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        locator.on_registered(move |key| s.lock().push(*key));

        locator.register::<dyn Audio>(Arc::new(Mixer(1)));
        locator.register(Arc::new(Clock));

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is::<dyn Audio>());
        assert!(seen[1].is::<Clock>());
    }

    #[test]
    fn test_overwrite_notifies_again() {
        let locator = ServiceLocator::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        locator.on_registered(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        locator.register(Arc::new(Clock));
        locator.register(Arc::new(Clock));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_removed_listener_is_silent() {
        let locator = ServiceLocator::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let id = locator.on_registered(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(locator.remove_listener(id));
        assert!(!locator.remove_listener(id));
        locator.register(Arc::new(Clock));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_may_register_services() {
        let locator = Arc::new(ServiceLocator::new());
        let inner = Arc::clone(&locator);
        locator.on_registered(move |key| {
            if key.is::<Clock>() {
                inner.register(Arc::new(Mixer(9)));
            }
        });

        locator.register(Arc::new(Clock));
        assert_eq!(locator.get::<Mixer>().unwrap().0, 9);
    }

    #[test]
    fn test_keys_in_registration_order_and_clear() {
        let locator = ServiceLocator::new();
        locator.register(Arc::new(Clock));
        locator.register(Arc::new(Mixer(1)));

        let keys = locator.keys();
        assert!(keys[0].is::<Clock>());
        assert!(keys[1].is::<Mixer>());
        assert!(locator.contains::<Clock>());

        locator.clear();
        assert!(locator.is_empty());
        assert!(!locator.contains::<Clock>());
    }

    #[test]
    fn test_service_key_equality_ignores_name() {
        assert_eq!(ServiceKey::of::<Clock>(), ServiceKey::of::<Clock>());
        assert_ne!(ServiceKey::of::<Clock>(), ServiceKey::of::<Mixer>());
        assert_eq!(ServiceKey::of::<Clock>().to_string(), type_name::<Clock>());
    }
}
