//! Process-wide UI manager bound to the process-wide bus.
//!
//! Panels bound with `PanelBinding::bind(&events::bus(), …)` receive the
//! events these functions publish.

use once_cell::sync::Lazy;

use super::chain::UiChain;
use super::manager::UiManager;
use super::panel::Panel;
use crate::events;

static MANAGER: Lazy<UiManager> = Lazy::new(|| UiManager::new(events::bus()));

pub fn manager() -> &'static UiManager {
    &MANAGER
}

pub fn open<P: Panel>() {
    MANAGER.open::<P>();
}

pub fn close<P: Panel>() {
    MANAGER.close::<P>();
}

pub fn toggle<P: Panel>() {
    MANAGER.toggle::<P>();
}

pub fn close_all() {
    MANAGER.close_all();
}

pub fn chain() -> UiChain<'static> {
    MANAGER.chain()
}
