//! Startup wiring and the scripted demo session.

use std::sync::Arc;

use tracing::info;

use nightwire::events::{self, EventBus};
use nightwire::services::{self, Capabilities, ListenerId, Readiness, ServiceLocator};
use nightwire::ui::{self, Panel, UiManager};

use super::panels::{InventoryPanel, SettingsPanel};
use super::services::{AudioManager, AudioService, SceneService, TimeService, Tickable};
use crate::handlers::{self, DamagedEvent, GameplayListeners, Sanity, ServiceRegistered};

pub const FIRST_SCENE: &str = "Asylum_Entrance";

/// Everything the demo keeps alive after startup.
pub struct App {
    pub bus: Arc<EventBus>,
    pub locator: Arc<ServiceLocator>,
    pub ui: &'static UiManager,
    pub settings: Arc<SettingsPanel>,
    pub inventory: Arc<InventoryPanel>,
    pub sanity: Arc<Sanity>,
    pub ready: Readiness,
    bridge: ListenerId,
    _listeners: GameplayListeners,
}

/// Build the process-wide app: listeners first, then services, then panels.
///
/// Gameplay code may start publishing as soon as the readiness callback
/// fires, whichever order the services came up in.
pub fn bootstrap() -> App {
    let bus = events::bus();
    let locator = services::locator();
    let sanity = Arc::new(Sanity::new());
    let listeners = handlers::install(&bus, Arc::clone(&sanity));

    // Registrations become bus events so unrelated systems can watch them
    let bridge_bus = Arc::clone(&bus);
    let bridge = locator.on_registered(move |key| {
        bridge_bus.publish(ServiceRegistered { name: key.name() });
    });

    let ready = Readiness::new()
        .require::<dyn AudioService>()
        .require::<SceneService>()
        .require::<TimeService>();
    ready.on_ready(|| info!("Core services ready"));
    ready.attach(&locator);

    let time = Arc::new(TimeService::default());
    locator.register_with(
        Arc::clone(&time),
        Capabilities::new().with::<dyn Tickable>(time),
    );
    locator.register::<dyn AudioService>(Arc::new(AudioManager::default()));
    locator.register(Arc::new(SceneService::new(FIRST_SCENE)));

    let settings = Arc::new(SettingsPanel::default());
    let inventory = Arc::new(InventoryPanel::default());
    settings.activate(&bus);
    inventory.activate(&bus);

    App {
        bus,
        locator,
        ui: ui::manager(),
        settings,
        inventory,
        sanity,
        ready,
        bridge,
        _listeners: listeners,
    }
}

/// A short scripted session exercising every subsystem.
pub fn run_demo(app: &App) {
    for tickable in app.locator.get_all::<dyn Tickable>() {
        tickable.tick(0.016);
    }

    app.bus.publish(DamagedEvent { amount: 10 });
    app.bus.publish(DamagedEvent { amount: 25 });
    info!("Sanity left: {}", app.sanity.value());

    app.ui.open::<SettingsPanel>();
    app.ui
        .chain()
        .open::<InventoryPanel>()
        .toggle::<SettingsPanel>()
        .toggle::<SettingsPanel>()
        .execute();
    info!("Open panels: {:?}", app.ui.open_panels());

    if let Ok(scenes) = app.locator.require::<SceneService>() {
        scenes.load("Asylum_Basement");
    }

    app.ui.close_all();
    info!(
        "Settings visible: {}, inventory visible: {}",
        app.settings.is_visible(),
        app.inventory.is_visible()
    );
}

impl App {
    /// Unbind panels and detach from the locator.
    pub fn shutdown(self) {
        self.settings.deactivate();
        self.inventory.deactivate();
        self.locator.remove_listener(self.bridge);
        info!("Shut down");
    }
}
