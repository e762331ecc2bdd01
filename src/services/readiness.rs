//! Startup readiness tracking.
//!
//! Services register themselves in whatever order bootstrap happens to run.
//! A `Readiness` watches a locator's registration hook and fires its
//! callbacks once every required key has appeared.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nightwire::services::{Readiness, ServiceLocator};
//!
//! struct Audio;
//! struct Scenes;
//!
//! let locator = ServiceLocator::new();
//! let ready = Readiness::new().require::<Audio>().require::<Scenes>();
//! ready.attach(&locator);
//!
//! locator.register(Arc::new(Audio));
//! assert!(!ready.is_ready());
//! locator.register(Arc::new(Scenes));
//! assert!(ready.is_ready());
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::locator::{ListenerId, ServiceKey, ServiceLocator};

type ReadyCallback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct ReadinessState {
    pending: Vec<ServiceKey>,
    ready: bool,
    callbacks: Vec<ReadyCallback>,
}

impl ReadinessState {
    /// Marks `key` present. Returns the callbacks to run if this completed
    /// the set.
    fn mark(&mut self, key: &ServiceKey) -> Vec<ReadyCallback> {
        self.pending.retain(|k| k != key);
        self.complete_if_done()
    }

    fn complete_if_done(&mut self) -> Vec<ReadyCallback> {
        if self.ready || !self.pending.is_empty() {
            return Vec::new();
        }
        self.ready = true;
        std::mem::take(&mut self.callbacks)
    }
}

/// Coordinator that waits for a set of service keys.
#[derive(Clone, Default)]
pub struct Readiness {
    state: Arc<Mutex<ReadinessState>>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `T` to the required keys. Only meaningful before `attach`.
    pub fn require<T: ?Sized + 'static>(self) -> Self {
        self.require_key(ServiceKey::of::<T>())
    }

    pub fn require_key(self, key: ServiceKey) -> Self {
        {
            let mut state = self.state.lock();
            if !state.pending.contains(&key) {
                state.pending.push(key);
            }
        }
        self
    }

    /// Run `callback` once all required services exist. Runs immediately if
    /// that is already the case.
    pub fn on_ready<F: FnOnce() + Send + 'static>(&self, callback: F) {
        let mut state = self.state.lock();
        if state.ready {
            drop(state);
            callback();
        } else {
            state.callbacks.push(Box::new(callback));
        }
    }

    /// Start watching `locator`. Keys already registered count immediately.
    ///
    /// The listener goes in before the already-registered keys are pruned,
    /// so a registration racing with `attach` is seen by one or the other.
    pub fn attach(&self, locator: &ServiceLocator) -> ListenerId {
        let state = Arc::clone(&self.state);
        let id = locator.on_registered(move |key| {
            let due = state.lock().mark(key);
            if !due.is_empty() {
                debug!("Last required service {} registered", key);
            }
            run(due);
        });

        let due = {
            let mut state = self.state.lock();
            state.pending.retain(|k| !locator.contains_key(k));
            state.complete_if_done()
        };
        run(due);
        id
    }

    pub fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    /// Required keys not registered yet.
    pub fn pending(&self) -> Vec<ServiceKey> {
        self.state.lock().pending.clone()
    }
}

fn run(callbacks: Vec<ReadyCallback>) {
    if callbacks.is_empty() {
        return;
    }
    info!("All required services registered");
    for callback in callbacks {
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Audio;
    struct Scenes;
    struct Time;

    fn counting(ready: &Readiness) -> Arc<AtomicUsize> {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&fired);
        ready.on_ready(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        fired
    }

    #[test]
    fn test_fires_once_after_last_registration() {
        let locator = ServiceLocator::new();
        let ready = Readiness::new().require::<Audio>().require::<Scenes>();
        let fired = counting(&ready);
        ready.attach(&locator);

        locator.register(Arc::new(Scenes));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(ready.pending(), vec![ServiceKey::of::<Audio>()]);

        locator.register(Arc::new(Audio));
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        locator.register(Arc::new(Audio));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_already_registered_services_count_at_attach() {
        let locator = ServiceLocator::new();
        locator.register(Arc::new(Audio));

        let ready = Readiness::new().require::<Audio>();
        let fired = counting(&ready);
        ready.attach(&locator);

        assert!(ready.is_ready());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_late_callback_runs_immediately() {
        let locator = ServiceLocator::new();
        let ready = Readiness::new().require::<Time>();
        ready.attach(&locator);
        locator.register(Arc::new(Time));

        let fired = counting(&ready);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unrelated_services_do_not_complete() {
        let locator = ServiceLocator::new();
        let ready = Readiness::new().require::<Time>();
        ready.attach(&locator);
        locator.register(Arc::new(Audio));
        assert!(!ready.is_ready());
    }

    #[test]
    fn test_registration_racing_attach_is_not_lost() {
        use std::sync::Barrier;
        use std::thread;

        for _ in 0..500 {
            let locator = Arc::new(ServiceLocator::new());
            let ready = Readiness::new().require::<Audio>();
            let barrier = Arc::new(Barrier::new(2));

            let registrar = {
                let locator = Arc::clone(&locator);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    locator.register(Arc::new(Audio));
                })
            };

            barrier.wait();
            ready.attach(&locator);
            registrar.join().expect("registrar thread panicked");

            assert!(locator.contains::<Audio>());
            assert!(ready.is_ready());
        }
    }

    #[test]
    fn test_duplicate_requirements_collapse() {
        let ready = Readiness::new().require::<Time>().require::<Time>();
        assert_eq!(ready.pending().len(), 1);
    }
}
