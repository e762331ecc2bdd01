//! Panel side of the UI routing contract.
//!
//! A panel is anything that can be shown and hidden. It reacts to the
//! `OpenUi/CloseUi/ToggleUi` events for its own type:
//! - Open, or Toggle while hidden → becomes visible
//! - Close, or Toggle while visible → becomes hidden
//!
//! How it animates between the two is its own business. [`PanelVisibility`]
//! is an optional helper holding the usual four-state machine.
//!
//! Panels subscribe through [`PanelBinding`], usually from their activation
//! hook, and drop the binding when deactivated.

use std::any::type_name;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use super::events::{CloseUi, OpenUi, ToggleUi};
use crate::events::{handler, EventBus, Handler};

/// Something the UI layer can show and hide.
pub trait Panel: Send + Sync + 'static {
    fn show(&self);
    fn hide(&self);
    fn is_visible(&self) -> bool;
}

/// Visibility state of a panel with show/hide transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    Showing,
    Shown,
    Hiding,
}

impl PanelState {
    /// Showing and Shown count as visible: a panel mid-fade-in is on screen.
    pub fn is_visible(self) -> bool {
        matches!(self, PanelState::Showing | PanelState::Shown)
    }

    pub fn is_transitioning(self) -> bool {
        matches!(self, PanelState::Showing | PanelState::Hiding)
    }

    pub fn on_open(self) -> PanelState {
        match self {
            PanelState::Hidden | PanelState::Hiding => PanelState::Showing,
            other => other,
        }
    }

    pub fn on_close(self) -> PanelState {
        match self {
            PanelState::Shown | PanelState::Showing => PanelState::Hiding,
            other => other,
        }
    }

    pub fn on_toggle(self) -> PanelState {
        if self.is_visible() {
            self.on_close()
        } else {
            self.on_open()
        }
    }

    /// Transition finished (animation done).
    pub fn finish(self) -> PanelState {
        match self {
            PanelState::Showing => PanelState::Shown,
            PanelState::Hiding => PanelState::Hidden,
            other => other,
        }
    }
}

/// Thread-safe holder for a `PanelState`, embeddable in panel structs.
///
/// Every `request_*` returns the new state, or `None` if nothing changed.
#[derive(Debug, Default)]
pub struct PanelVisibility {
    state: Mutex<PanelState>,
}

impl PanelVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        *self.state.lock()
    }

    pub fn is_visible(&self) -> bool {
        self.state().is_visible()
    }

    pub fn request_open(&self) -> Option<PanelState> {
        self.apply(PanelState::on_open)
    }

    pub fn request_close(&self) -> Option<PanelState> {
        self.apply(PanelState::on_close)
    }

    pub fn request_toggle(&self) -> Option<PanelState> {
        self.apply(PanelState::on_toggle)
    }

    pub fn finish_transition(&self) -> Option<PanelState> {
        self.apply(PanelState::finish)
    }

    fn apply(&self, transition: fn(PanelState) -> PanelState) -> Option<PanelState> {
        let mut state = self.state.lock();
        let next = transition(*state);
        if next == *state {
            return None;
        }
        *state = next;
        Some(next)
    }
}

/// Live subscription of one panel instance to its UI events.
///
/// Handlers hold a `Weak` to the panel, so a panel may own its binding.
/// Dropping the binding unsubscribes.
pub struct PanelBinding<P: Panel> {
    bus: Arc<EventBus>,
    open: Handler<OpenUi<P>>,
    close: Handler<CloseUi<P>>,
    toggle: Handler<ToggleUi<P>>,
}

impl<P: Panel> PanelBinding<P> {
    pub fn bind(bus: &Arc<EventBus>, panel: &Arc<P>) -> Self {
        let weak = Arc::downgrade(panel);
        let open = on_event(&weak, |panel: &P, event: &OpenUi<P>| {
            if event.applies_to(panel) {
                panel.show();
            }
        });
        let close = on_event(&weak, |panel: &P, event: &CloseUi<P>| {
            if event.applies_to(panel) {
                panel.hide();
            }
        });
        let toggle = on_event(&weak, |panel: &P, event: &ToggleUi<P>| {
            if !event.applies_to(panel) {
                return;
            }
            if panel.is_visible() {
                panel.hide();
            } else {
                panel.show();
            }
        });

        bus.subscribe(&open);
        bus.subscribe(&close);
        bus.subscribe(&toggle);
        debug!("Bound panel {}", type_name::<P>());

        Self {
            bus: Arc::clone(bus),
            open,
            close,
            toggle,
        }
    }

    /// Unsubscribe now instead of at drop.
    pub fn unbind(self) {}
}

fn on_event<P, E, F>(panel: &Weak<P>, f: F) -> Handler<E>
where
    P: Panel,
    E: 'static,
    F: Fn(&P, &E) + Send + Sync + 'static,
{
    let panel = Weak::clone(panel);
    handler(move |event: &E| {
        if let Some(panel) = panel.upgrade() {
            f(&panel, event);
        }
    })
}

impl<P: Panel> Drop for PanelBinding<P> {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.open);
        self.bus.unsubscribe(&self.close);
        self.bus.unsubscribe(&self.toggle);
        debug!("Unbound panel {}", type_name::<P>());
    }
}

impl<P: Panel> fmt::Debug for PanelBinding<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelBinding")
            .field("panel", &type_name::<P>())
            .finish()
    }
}
