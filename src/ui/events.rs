//! UI routing events.
//!
//! `OpenUi<P>`, `CloseUi<P>` and `ToggleUi<P>` are ordinary bus payloads,
//! one channel per action per panel type: `OpenUi<SettingsPanel>` and
//! `OpenUi<InventoryPanel>` are unrelated. Each carries an optional target
//! instance, used only when several instances of the same panel type exist.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// The three UI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiAction {
    Open,
    Close,
    Toggle,
}

impl UiAction {
    pub fn description(&self) -> &'static str {
        match self {
            UiAction::Open => "open",
            UiAction::Close => "close",
            UiAction::Toggle => "toggle",
        }
    }
}

impl fmt::Display for UiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Type-level tag selecting which action a `UiEvent` carries.
pub trait UiKind: 'static {
    const ACTION: UiAction;
}

#[derive(Debug)]
pub enum Open {}

#[derive(Debug)]
pub enum Close {}

#[derive(Debug)]
pub enum Toggle {}

impl UiKind for Open {
    const ACTION: UiAction = UiAction::Open;
}

impl UiKind for Close {
    const ACTION: UiAction = UiAction::Close;
}

impl UiKind for Toggle {
    const ACTION: UiAction = UiAction::Toggle;
}

/// A UI operation of kind `K` addressed to panel type `P`.
pub struct UiEvent<K: UiKind, P: 'static> {
    target: Option<Arc<P>>,
    _kind: PhantomData<fn() -> K>,
}

pub type OpenUi<P> = UiEvent<Open, P>;
pub type CloseUi<P> = UiEvent<Close, P>;
pub type ToggleUi<P> = UiEvent<Toggle, P>;

impl<K: UiKind, P: 'static> UiEvent<K, P> {
    /// Addressed to every instance of `P`.
    pub fn broadcast() -> Self {
        Self {
            target: None,
            _kind: PhantomData,
        }
    }

    /// Addressed to one specific instance.
    pub fn targeted(panel: Arc<P>) -> Self {
        Self {
            target: Some(panel),
            _kind: PhantomData,
        }
    }

    pub fn action(&self) -> UiAction {
        K::ACTION
    }

    pub fn target(&self) -> Option<&Arc<P>> {
        self.target.as_ref()
    }

    /// True if `panel` should react: no target, or `panel` is the target.
    pub fn applies_to(&self, panel: &P) -> bool {
        match &self.target {
            None => true,
            Some(target) => std::ptr::eq(Arc::as_ptr(target), panel),
        }
    }
}

impl<K: UiKind, P: 'static> Clone for UiEvent<K, P> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: UiKind, P: 'static> fmt::Debug for UiEvent<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiEvent")
            .field("action", &K::ACTION)
            .field("panel", &std::any::type_name::<P>())
            .field("targeted", &self.target.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;

    struct Settings;
    struct Inventory;

    #[test]
    fn test_each_action_and_panel_is_its_own_type() {
        assert_ne!(TypeId::of::<OpenUi<Settings>>(), TypeId::of::<CloseUi<Settings>>());
        assert_ne!(TypeId::of::<OpenUi<Settings>>(), TypeId::of::<OpenUi<Inventory>>());
        assert_eq!(TypeId::of::<ToggleUi<Settings>>(), TypeId::of::<ToggleUi<Settings>>());
    }

    #[test]
    fn test_broadcast_applies_to_everyone() {
        let panel = Settings;
        assert!(OpenUi::<Settings>::broadcast().applies_to(&panel));
    }

    #[test]
    fn test_targeted_applies_only_to_target() {
        let a = Arc::new(Settings);
        let b = Arc::new(Settings);
        let event = CloseUi::targeted(Arc::clone(&a));
        assert!(event.applies_to(&a));
        assert!(!event.applies_to(&b));
    }

    #[test]
    fn test_action_matches_kind() {
        assert_eq!(OpenUi::<Settings>::broadcast().action(), UiAction::Open);
        assert_eq!(CloseUi::<Settings>::broadcast().action(), UiAction::Close);
        assert_eq!(ToggleUi::<Settings>::broadcast().action(), UiAction::Toggle);
    }

    #[test]
    fn test_debug_names_action_and_panel() {
        let debug = format!("{:?}", ToggleUi::<Inventory>::broadcast());
        assert!(debug.contains("Toggle"));
        assert!(debug.contains("Inventory"));
        assert!(debug.contains("targeted: false"));
    }
}
