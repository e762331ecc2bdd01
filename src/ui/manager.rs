//! Typed UI routing façade.
//!
//! `UiManager` turns "open/close/toggle panel type `P`" into bus events and
//! keeps a best-effort record of which panel types it believes are open.
//! That record only sees calls made through the manager: a panel shown or
//! hidden any other way silently desyncs it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nightwire::events::EventBus;
//! use nightwire::ui::{Panel, UiManager};
//!
//! struct Map;
//! impl Panel for Map {
//!     fn show(&self) {}
//!     fn hide(&self) {}
//!     fn is_visible(&self) -> bool { false }
//! }
//!
//! let ui = UiManager::new(Arc::new(EventBus::new()));
//! ui.open::<Map>();
//! assert!(ui.is_open::<Map>());
//! ui.close_all();
//! assert_eq!(ui.open_count(), 0);
//! ```

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::chain::UiChain;
use super::events::{CloseUi, OpenUi, ToggleUi};
use super::panel::Panel;
use crate::events::EventBus;

/// One tracked panel type. `close` is `UiManager::close::<P>` for that type,
/// so `close_all` can reach the generic method without knowing `P`.
struct OpenPanel {
    id: TypeId,
    name: &'static str,
    close: fn(&UiManager),
}

impl OpenPanel {
    fn of<P: Panel>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            name: type_name::<P>(),
            close: UiManager::close::<P>,
        }
    }
}

pub struct UiManager {
    bus: Arc<EventBus>,
    open: Mutex<Vec<OpenPanel>>,
}

impl UiManager {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            open: Mutex::new(Vec::new()),
        }
    }

    /// The bus UI events are published on.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Publish `OpenUi<P>` to every `P` and mark `P` open.
    pub fn open<P: Panel>(&self) {
        self.bus.publish(OpenUi::<P>::broadcast());
        self.track::<P>();
        debug!("Opened {}", type_name::<P>());
    }

    /// Publish `OpenUi<P>` addressed to `panel` only.
    pub fn open_instance<P: Panel>(&self, panel: Arc<P>) {
        self.bus.publish(OpenUi::targeted(panel));
        self.track::<P>();
        debug!("Opened one {}", type_name::<P>());
    }

    pub fn close<P: Panel>(&self) {
        self.bus.publish(CloseUi::<P>::broadcast());
        self.untrack::<P>();
        debug!("Closed {}", type_name::<P>());
    }

    pub fn close_instance<P: Panel>(&self, panel: Arc<P>) {
        self.bus.publish(CloseUi::targeted(panel));
        self.untrack::<P>();
        debug!("Closed one {}", type_name::<P>());
    }

    /// Publish `ToggleUi<P>` and flip whether `P` is tracked as open.
    pub fn toggle<P: Panel>(&self) {
        self.bus.publish(ToggleUi::<P>::broadcast());
        self.flip::<P>();
    }

    pub fn toggle_instance<P: Panel>(&self, panel: Arc<P>) {
        self.bus.publish(ToggleUi::targeted(panel));
        self.flip::<P>();
    }

    /// Close every tracked panel type, then clear the record.
    ///
    /// Each type gets its own `CloseUi<P>` broadcast, in the order the types
    /// were opened.
    pub fn close_all(&self) {
        let closers: Vec<(&'static str, fn(&UiManager))> = self
            .open
            .lock()
            .iter()
            .map(|p| (p.name, p.close))
            .collect();

        for (name, close) in &closers {
            debug!("Closing {} as part of close_all", name);
            close(self);
        }

        self.open.lock().clear();
        debug!("Closed {} panel type(s)", closers.len());
    }

    /// Start a batch of UI operations, run in order by `execute()`.
    pub fn chain(&self) -> UiChain<'_> {
        UiChain::new(self)
    }

    /// Whether `P` was opened through this manager and not closed since.
    pub fn is_open<P: Panel>(&self) -> bool {
        let id = TypeId::of::<P>();
        self.open.lock().iter().any(|p| p.id == id)
    }

    pub fn open_count(&self) -> usize {
        self.open.lock().len()
    }

    /// Tracked panel type names, in the order they were opened.
    pub fn open_panels(&self) -> Vec<&'static str> {
        self.open.lock().iter().map(|p| p.name).collect()
    }

    /// Forget every tracked panel without publishing anything.
    pub fn clear_tracking(&self) {
        self.open.lock().clear();
    }

    fn track<P: Panel>(&self) {
        let id = TypeId::of::<P>();
        let mut open = self.open.lock();
        if !open.iter().any(|p| p.id == id) {
            open.push(OpenPanel::of::<P>());
        }
    }

    fn untrack<P: Panel>(&self) {
        let id = TypeId::of::<P>();
        self.open.lock().retain(|p| p.id != id);
    }

    fn flip<P: Panel>(&self) {
        let id = TypeId::of::<P>();
        let mut open = self.open.lock();
        match open.iter().position(|p| p.id == id) {
            Some(pos) => {
                open.remove(pos);
                debug!("Toggled {} (now closed)", type_name::<P>());
            }
            None => {
                open.push(OpenPanel::of::<P>());
                debug!("Toggled {} (now open)", type_name::<P>());
            }
        }
    }
}

impl fmt::Debug for UiManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiManager")
            .field("open", &self.open_panels())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Settings;
    struct Inventory;

    impl Panel for Settings {
        fn show(&self) {}
        fn hide(&self) {}
        fn is_visible(&self) -> bool {
            false
        }
    }

    impl Panel for Inventory {
        fn show(&self) {}
        fn hide(&self) {}
        fn is_visible(&self) -> bool {
            false
        }
    }

    fn manager() -> UiManager {
        UiManager::new(Arc::new(EventBus::new()))
    }

    #[test]
    fn test_new_manager_tracks_nothing() {
        let ui = manager();
        assert_eq!(ui.open_count(), 0);
        assert!(!ui.is_open::<Settings>());
    }

    #[test]
    fn test_open_then_close() {
        let ui = manager();
        ui.open::<Settings>();
        assert!(ui.is_open::<Settings>());
        assert!(!ui.is_open::<Inventory>());

        ui.close::<Settings>();
        assert!(!ui.is_open::<Settings>());
    }

    #[test]
    fn test_open_twice_tracks_once() {
        let ui = manager();
        ui.open::<Settings>();
        ui.open::<Settings>();
        assert_eq!(ui.open_count(), 1);
    }

    #[test]
    fn test_toggle_flips_each_call() {
        let ui = manager();
        ui.toggle::<Inventory>();
        assert!(ui.is_open::<Inventory>());
        ui.toggle::<Inventory>();
        assert!(!ui.is_open::<Inventory>());
        ui.toggle::<Inventory>();
        assert!(ui.is_open::<Inventory>());
    }

    #[test]
    fn test_close_never_opened_is_harmless() {
        let ui = manager();
        ui.close::<Settings>();
        assert_eq!(ui.open_count(), 0);
    }

    #[test]
    fn test_operations_publish_on_bus() {
        let ui = manager();
        ui.open::<Settings>();
        ui.toggle::<Settings>();
        ui.close_instance(Arc::new(Settings));

        assert_eq!(ui.bus().publish_count::<OpenUi<Settings>>(), 1);
        assert_eq!(ui.bus().publish_count::<ToggleUi<Settings>>(), 1);
        assert_eq!(ui.bus().publish_count::<CloseUi<Settings>>(), 1);
    }

    #[test]
    fn test_close_all_publishes_close_per_type() {
        let ui = manager();
        let closes = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&closes);
        ui.bus().subscribe_fn(move |_: &CloseUi<Settings>| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let c = Arc::clone(&closes);
        ui.bus().subscribe_fn(move |_: &CloseUi<Inventory>| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        ui.open::<Settings>();
        ui.open::<Inventory>();
        ui.close_all();

        assert_eq!(closes.load(Ordering::SeqCst), 2);
        assert_eq!(ui.open_count(), 0);
    }

    #[test]
    fn test_open_panels_keeps_open_order() {
        let ui = manager();
        ui.open::<Inventory>();
        ui.open::<Settings>();
        let names = ui.open_panels();
        assert!(names[0].ends_with("Inventory"));
        assert!(names[1].ends_with("Settings"));
    }

    #[test]
    fn test_clear_tracking_publishes_nothing() {
        let ui = manager();
        ui.open::<Settings>();
        ui.clear_tracking();
        assert_eq!(ui.open_count(), 0);
        assert_eq!(ui.bus().publish_count::<CloseUi<Settings>>(), 0);
    }
}
