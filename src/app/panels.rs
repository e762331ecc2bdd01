//! Demo panels. Show/hide is instantaneous: each request runs the
//! transition and finishes it straight away.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use nightwire::events::EventBus;
use nightwire::ui::{Panel, PanelBinding, PanelVisibility};

/// Panel plumbing shared by the demo panels: visibility plus the live
/// event binding while the panel is active.
pub struct PanelCore<P: Panel> {
    visibility: PanelVisibility,
    binding: Mutex<Option<PanelBinding<P>>>,
}

impl<P: Panel> Default for PanelCore<P> {
    fn default() -> Self {
        Self {
            visibility: PanelVisibility::new(),
            binding: Mutex::new(None),
        }
    }
}

impl<P: Panel> PanelCore<P> {
    fn show(&self, name: &str) {
        if self.visibility.request_open().is_some() {
            self.visibility.finish_transition();
            info!("{} shown", name);
        }
    }

    fn hide(&self, name: &str) {
        if self.visibility.request_close().is_some() {
            self.visibility.finish_transition();
            info!("{} hidden", name);
        }
    }

    fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    fn activate(&self, bus: &Arc<EventBus>, panel: &Arc<P>) {
        *self.binding.lock() = Some(PanelBinding::bind(bus, panel));
    }

    fn deactivate(&self) {
        self.binding.lock().take();
    }
}

#[derive(Default)]
pub struct SettingsPanel {
    core: PanelCore<SettingsPanel>,
}

impl SettingsPanel {
    pub fn activate(self: &Arc<Self>, bus: &Arc<EventBus>) {
        self.core.activate(bus, self);
    }

    pub fn deactivate(&self) {
        self.core.deactivate();
    }
}

impl Panel for SettingsPanel {
    fn show(&self) {
        self.core.show("Settings");
    }

    fn hide(&self) {
        self.core.hide("Settings");
    }

    fn is_visible(&self) -> bool {
        self.core.is_visible()
    }
}

#[derive(Default)]
pub struct InventoryPanel {
    core: PanelCore<InventoryPanel>,
}

impl InventoryPanel {
    pub fn activate(self: &Arc<Self>, bus: &Arc<EventBus>) {
        self.core.activate(bus, self);
    }

    pub fn deactivate(&self) {
        self.core.deactivate();
    }
}

impl Panel for InventoryPanel {
    fn show(&self) {
        self.core.show("Inventory");
    }

    fn hide(&self) {
        self.core.hide("Inventory");
    }

    fn is_visible(&self) -> bool {
        self.core.is_visible()
    }
}
