//! Deferred batches of UI operations.
//!
//! ```
//! # use std::sync::Arc;
//! # use nightwire::events::EventBus;
//! # use nightwire::ui::{Panel, UiManager};
//! # struct Pause;
//! # struct Hud;
//! # impl Panel for Pause {
//! #     fn show(&self) {}
//! #     fn hide(&self) {}
//! #     fn is_visible(&self) -> bool { false }
//! # }
//! # impl Panel for Hud {
//! #     fn show(&self) {}
//! #     fn hide(&self) {}
//! #     fn is_visible(&self) -> bool { false }
//! # }
//! let ui = UiManager::new(Arc::new(EventBus::new()));
//! let batch = ui.chain().open::<Pause>().close::<Hud>();
//! assert!(!ui.is_open::<Pause>());
//! batch.execute();
//! assert!(ui.is_open::<Pause>());
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::events::UiAction;
use super::manager::UiManager;
use super::panel::Panel;

struct Step {
    action: UiAction,
    panel: &'static str,
    run: Box<dyn FnOnce(&UiManager)>,
}

/// A recorded sequence of UI operations. Nothing is published until
/// [`execute`](UiChain::execute).
#[must_use = "a UiChain does nothing until execute() is called"]
pub struct UiChain<'a> {
    manager: &'a UiManager,
    steps: Vec<Step>,
}

impl<'a> UiChain<'a> {
    pub(crate) fn new(manager: &'a UiManager) -> Self {
        Self {
            manager,
            steps: Vec::new(),
        }
    }

    pub fn open<P: Panel>(self) -> Self {
        self.push::<P>(UiAction::Open, |m| m.open::<P>())
    }

    pub fn open_instance<P: Panel>(self, panel: Arc<P>) -> Self {
        self.push::<P>(UiAction::Open, move |m| m.open_instance(panel))
    }

    pub fn close<P: Panel>(self) -> Self {
        self.push::<P>(UiAction::Close, |m| m.close::<P>())
    }

    pub fn close_instance<P: Panel>(self, panel: Arc<P>) -> Self {
        self.push::<P>(UiAction::Close, move |m| m.close_instance(panel))
    }

    pub fn toggle<P: Panel>(self) -> Self {
        self.push::<P>(UiAction::Toggle, |m| m.toggle::<P>())
    }

    pub fn toggle_instance<P: Panel>(self, panel: Arc<P>) -> Self {
        self.push::<P>(UiAction::Toggle, move |m| m.toggle_instance(panel))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Recorded operations as `(action, panel type name)`, in order.
    pub fn steps(&self) -> Vec<(UiAction, &'static str)> {
        self.steps.iter().map(|s| (s.action, s.panel)).collect()
    }

    /// Run every recorded operation in the order it was added.
    pub fn execute(self) {
        debug!("Executing UI chain of {} step(s)", self.steps.len());
        for step in self.steps {
            (step.run)(self.manager);
        }
    }

    fn push<P: Panel>(
        mut self,
        action: UiAction,
        run: impl FnOnce(&UiManager) + 'static,
    ) -> Self {
        self.steps.push(Step {
            action,
            panel: type_name::<P>(),
            run: Box::new(run),
        });
        self
    }
}

impl fmt::Debug for UiChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiChain")
            .field("steps", &self.steps())
            .finish()
    }
}
