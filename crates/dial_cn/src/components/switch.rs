//! Switch component for boolean toggles
//!
//! # Example
//!
//! ```rust
//! use dial_cn::prelude::*;
//!
//! let notifications = cn::switch()
//!     .name("notifications")
//!     .label("Enable notifications")
//!     .build();
//!
//! notifications.click();
//! assert!(notifications.is_checked());
//!
//! let field = notifications.hidden_input().unwrap();
//! assert_eq!(field.submission(), Some(("notifications", "on")));
//! ```

use std::cell::Cell;
use std::rc::Rc;

use dial_core::a11y::{AccessibilityProps, Role};
use dial_core::controllable::{ChangeCallback, ValueController};
use dial_core::events::KeyCode;
use dial_core::form::FormField;
use dial_core::fsm::StateTransitions;

/// Switch FSM events
pub mod switch_events {
    pub const TOGGLE: u32 = 30301;
}

/// Displayed switch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwitchState {
    #[default]
    Off,
    On,
}

impl SwitchState {
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            SwitchState::On
        } else {
            SwitchState::Off
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, SwitchState::On)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchState::On => "checked",
            SwitchState::Off => "unchecked",
        }
    }
}

impl StateTransitions for SwitchState {
    fn on_event(&self, event: u32) -> Option<Self> {
        match (self, event) {
            (SwitchState::Off, switch_events::TOGGLE) => Some(SwitchState::On),
            (SwitchState::On, switch_events::TOGGLE) => Some(SwitchState::Off),
            _ => None,
        }
    }
}

/// Plain-data switch configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SwitchProps {
    /// Controlled state; latches controlled mode when present
    pub checked: Option<bool>,
    pub default_checked: bool,
    pub disabled: bool,
    pub required: bool,
    pub name: Option<String>,
    /// Submitted value while checked
    pub value: String,
    /// Accessible label
    pub label: Option<String>,
}

impl Default for SwitchProps {
    fn default() -> Self {
        Self {
            checked: None,
            default_checked: false,
            disabled: false,
            required: false,
            name: None,
            value: "on".to_string(),
            label: None,
        }
    }
}

/// Headless toggle switch
#[derive(Clone)]
pub struct ToggleSwitch {
    inner: Rc<SwitchInner>,
}

struct SwitchInner {
    checked: ValueController<bool>,
    disabled: Cell<bool>,
    required: bool,
    name: Option<String>,
    value: String,
    label: Option<String>,
}

impl ToggleSwitch {
    fn with_config(config: SwitchConfig) -> Self {
        let props = config.props;
        Self {
            inner: Rc::new(SwitchInner {
                checked: ValueController::new(props.checked, props.default_checked)
                    .on_change_shared(config.on_change),
                disabled: Cell::new(props.disabled),
                required: props.required,
                name: props.name,
                value: props.value,
                label: props.label,
            }),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.inner.checked.current_value()
    }

    pub fn state(&self) -> SwitchState {
        SwitchState::from_checked(self.is_checked())
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.disabled.set(disabled);
    }

    /// Per-render reconciliation with the host's controlled state
    pub fn sync_checked(&self, checked: Option<bool>) {
        self.inner.checked.sync(checked);
    }

    /// Invert the state; ignored while disabled
    pub fn click(&self) {
        if self.is_disabled() {
            return;
        }
        if let Some(next) = self.state().on_event(switch_events::TOGGLE) {
            self.inner.checked.request(next.is_on());
        }
    }

    /// Space and Enter toggle; returns whether the key was consumed
    pub fn key_down(&self, key: KeyCode) -> bool {
        if !key.is_activation() || self.is_disabled() {
            return false;
        }
        self.click();
        true
    }

    pub fn accessibility(&self) -> AccessibilityProps {
        AccessibilityProps {
            label: self.inner.label.clone(),
            checked: Some(self.is_checked()),
            required: Some(self.inner.required),
            disabled: self.is_disabled(),
            data_state: Some(self.state().as_str()),
            ..AccessibilityProps::new(Role::Switch)
        }
    }

    /// Form-compatible checkbox mirroring the displayed state
    pub fn hidden_input(&self) -> Option<FormField> {
        let name = self.inner.name.as_ref()?;
        Some(
            FormField::checkbox(name.clone(), self.inner.value.clone(), self.is_checked())
                .disabled(self.is_disabled())
                .required(self.inner.required),
        )
    }
}

impl std::fmt::Debug for ToggleSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleSwitch")
            .field("checked", &self.is_checked())
            .field("disabled", &self.is_disabled())
            .finish()
    }
}

/// Internal configuration for building a ToggleSwitch
#[derive(Clone, Default)]
struct SwitchConfig {
    props: SwitchProps,
    on_change: Option<ChangeCallback<bool>>,
}

/// Builder for creating ToggleSwitch controls with fluent API
pub struct SwitchBuilder {
    config: SwitchConfig,
}

impl SwitchBuilder {
    pub fn new() -> Self {
        Self {
            config: SwitchConfig::default(),
        }
    }

    pub fn from_props(props: SwitchProps) -> Self {
        Self {
            config: SwitchConfig {
                props,
                ..Default::default()
            },
        }
    }

    /// Controlled state
    pub fn checked(mut self, checked: bool) -> Self {
        self.config.props.checked = Some(checked);
        self
    }

    pub fn default_checked(mut self, checked: bool) -> Self {
        self.config.props.default_checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.props.disabled = disabled;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.config.props.required = required;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.props.name = Some(name.into());
        self
    }

    /// Submitted value while checked (default: "on")
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.config.props.value = value.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.props.label = Some(label.into());
        self
    }

    /// Set the change callback
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(bool) + 'static,
    {
        self.config.on_change = Some(Rc::new(move |checked: &bool| callback(*checked)));
        self
    }

    pub fn build(self) -> ToggleSwitch {
        ToggleSwitch::with_config(self.config)
    }
}

impl Default for SwitchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a switch builder
pub fn switch() -> SwitchBuilder {
    SwitchBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_toggle_fsm() {
        let mut state = SwitchState::Off;
        assert!(state.apply(switch_events::TOGGLE));
        assert!(state.is_on());
        assert_eq!(state.on_event(0), None);
    }

    #[test]
    fn test_click_and_keys_toggle() {
        let s = switch().build();
        s.click();
        assert!(s.is_checked());
        assert!(s.key_down(KeyCode::SPACE));
        assert!(!s.is_checked());
        assert!(s.key_down(KeyCode::ENTER));
        assert!(s.is_checked());
        assert!(!s.key_down(KeyCode::ARROW_LEFT));
    }

    #[test]
    fn test_disabled_suppresses_toggle() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes_cb = changes.clone();
        let s = switch()
            .disabled(true)
            .on_change(move |c| changes_cb.borrow_mut().push(c))
            .build();
        s.click();
        assert!(!s.key_down(KeyCode::SPACE));
        assert!(!s.is_checked());
        assert!(changes.borrow().is_empty());
        assert!(s.accessibility().disabled);
    }

    #[test]
    fn test_controlled_waits_for_host() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes_cb = changes.clone();
        let s = switch()
            .checked(false)
            .on_change(move |c| changes_cb.borrow_mut().push(c))
            .build();

        s.click();
        s.click();
        assert_eq!(*changes.borrow(), vec![true]);
        assert!(!s.is_checked());

        s.sync_checked(Some(true));
        assert!(s.is_checked());
        s.click();
        assert_eq!(*changes.borrow(), vec![true, false]);
    }

    #[test]
    fn test_hidden_input_mirrors_state() {
        let s = switch().name("tts").value("yes").required(true).build();
        let field = s.hidden_input().unwrap();
        assert!(!field.checked);
        assert!(field.required);
        assert_eq!(field.submission(), None);

        s.click();
        assert_eq!(s.hidden_input().unwrap().submission(), Some(("tts", "yes")));
        assert!(switch().build().hidden_input().is_none());
    }

    #[test]
    fn test_accessibility() {
        let s = switch().default_checked(true).label("Voice").build();
        let props = s.accessibility();
        assert_eq!(props.attribute("role").as_deref(), Some("switch"));
        assert_eq!(props.attribute("aria-checked").as_deref(), Some("true"));
        assert_eq!(props.attribute("aria-required").as_deref(), Some("false"));
        assert_eq!(props.attribute("data-state").as_deref(), Some("checked"));
        assert_eq!(props.attribute("aria-label").as_deref(), Some("Voice"));
    }
}
