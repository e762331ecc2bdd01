//! Gameplay listeners.
//!
//! ```text
//! publish(DamagedEvent) → damage log   → AudioService::play("hurt")
//!                       → sanity drain → publish(SanityChanged) → sanity watch
//! ```
//!
//! Neither listener knows the other exists, or who published the damage.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use nightwire::events::{handler, EventBus, Handler};
use nightwire::services;

use crate::app::services::AudioService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamagedEvent {
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanityChanged {
    pub sanity: u32,
}

/// Published by the bootstrap bridge whenever a service registers.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRegistered {
    pub name: &'static str,
}

pub const MAX_SANITY: u32 = 100;

/// Below this the player starts hallucinating.
pub const LOW_SANITY: u32 = 25;

/// Player sanity, drained by damage.
#[derive(Debug)]
pub struct Sanity {
    value: Mutex<u32>,
}

impl Sanity {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(MAX_SANITY),
        }
    }

    pub fn value(&self) -> u32 {
        *self.value.lock()
    }

    /// Lose `amount`, saturating at zero. Returns the new value.
    pub fn drain(&self, amount: u32) -> u32 {
        let mut value = self.value.lock();
        *value = value.saturating_sub(amount);
        *value
    }
}

impl Default for Sanity {
    fn default() -> Self {
        Self::new()
    }
}

/// Handlers installed by [`install`]. Dropping this unsubscribes them.
pub struct GameplayListeners {
    bus: Arc<EventBus>,
    damage_log: Handler<DamagedEvent>,
    sanity_drain: Handler<DamagedEvent>,
    sanity_watch: Handler<SanityChanged>,
    registrations: Handler<ServiceRegistered>,
}

pub fn install(bus: &Arc<EventBus>, sanity: Arc<Sanity>) -> GameplayListeners {
    let damage_log = handler(|event: &DamagedEvent| {
        info!("Player took {} damage", event.amount);
        match services::global::get::<dyn AudioService>() {
            Some(audio) => audio.play("hurt"),
            None => warn!("No audio service, damage is silent"),
        }
    });

    let publisher = Arc::clone(bus);
    let sanity_drain = handler(move |event: &DamagedEvent| {
        let left = sanity.drain(event.amount);
        publisher.publish(SanityChanged { sanity: left });
    });

    let sanity_watch = handler(|event: &SanityChanged| {
        if event.sanity < LOW_SANITY {
            warn!("Sanity critical: {}", event.sanity);
        } else {
            info!("Sanity now {}", event.sanity);
        }
    });

    let registrations = handler(|event: &ServiceRegistered| {
        info!("Service available: {}", event.name);
    });

    bus.subscribe(&damage_log);
    bus.subscribe(&sanity_drain);
    bus.subscribe(&sanity_watch);
    bus.subscribe(&registrations);

    GameplayListeners {
        bus: Arc::clone(bus),
        damage_log,
        sanity_drain,
        sanity_watch,
        registrations,
    }
}

impl Drop for GameplayListeners {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.damage_log);
        self.bus.unsubscribe(&self.sanity_drain);
        self.bus.unsubscribe(&self.sanity_watch);
        self.bus.unsubscribe(&self.registrations);
    }
}
