//! Tabs component
//!
//! Exactly one trigger is active at a time. Keyboard focus roves over the
//! triggers independently of the active one. Panels mount lazily: a panel
//! that was never active is not instantiated, and once it has been active
//! it stays mounted (hidden while inactive) for the life of the group.
//!
//! # Example
//!
//! ```rust
//! use dial_cn::prelude::*;
//!
//! let settings = cn::tabs()
//!     .default_value("general")
//!     .tab("general", "General")
//!     .tab("voice", "Voice")
//!     .tab("advanced", "Advanced")
//!     .build();
//!
//! assert_eq!(settings.panel_visibility("voice"), Some(PanelVisibility::Unmounted));
//!
//! settings.activate("voice");
//! settings.activate("general");
//! assert_eq!(settings.panel_visibility("voice"), Some(PanelVisibility::Hidden));
//! assert_eq!(settings.mount_count("voice"), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use dial_core::a11y::{AccessibilityProps, Role};
use dial_core::controllable::{ChangeCallback, ValueController};
use dial_core::events::{KeyCode, Orientation};
use dial_core::fsm::StateTransitions;
use dial_core::roster::{FocusRoster, RosterMove};

/// Panel FSM events
pub mod tab_events {
    /// The panel's trigger became active
    pub const ACTIVATE: u32 = 30201;
    /// Another trigger became active
    pub const DEACTIVATE: u32 = 30202;
}

/// Mount and visibility state of one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelVisibility {
    /// Never active; nothing is instantiated
    #[default]
    Unmounted,
    /// Mounted but inactive
    Hidden,
    Active,
}

impl PanelVisibility {
    pub fn is_mounted(&self) -> bool {
        !matches!(self, PanelVisibility::Unmounted)
    }
}

impl StateTransitions for PanelVisibility {
    fn on_event(&self, event: u32) -> Option<Self> {
        use tab_events::*;
        match (self, event) {
            (PanelVisibility::Unmounted | PanelVisibility::Hidden, ACTIVATE) => {
                Some(PanelVisibility::Active)
            }
            // Once mounted, a panel only ever hides
            (PanelVisibility::Active, DEACTIVATE) => Some(PanelVisibility::Hidden),
            _ => None,
        }
    }
}

/// How roving focus relates to activation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActivationMode {
    /// Moving focus activates the focused trigger
    #[default]
    Automatic,
    /// Moving focus only moves focus; Enter/Space activate
    Manual,
}

/// One trigger with its panel
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabItem {
    pub value: String,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub disabled: bool,
    /// Mount the panel from the start
    #[cfg_attr(feature = "serde", serde(default))]
    pub force_mount: bool,
}

impl TabItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
            force_mount: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn force_mount(mut self, force_mount: bool) -> Self {
        self.force_mount = force_mount;
        self
    }
}

/// Plain-data tabs configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TabsProps {
    /// Controlled value; latches controlled mode when present
    pub value: Option<String>,
    pub default_value: Option<String>,
    pub orientation: Orientation,
    pub activation_mode: ActivationMode,
    /// Wrap roving focus at either end
    #[cfg_attr(feature = "serde", serde(rename = "loop"))]
    pub loop_focus: bool,
    /// Mount every panel from the start
    pub force_mount: bool,
    pub tabs: Vec<TabItem>,
}

impl Default for TabsProps {
    fn default() -> Self {
        Self {
            value: None,
            default_value: None,
            orientation: Orientation::Horizontal,
            activation_mode: ActivationMode::Automatic,
            loop_focus: true,
            force_mount: false,
            tabs: Vec::new(),
        }
    }
}

/// Display data for one trigger
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerView {
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub active: bool,
    pub focused: bool,
    pub accessibility: AccessibilityProps,
}

/// Display data for one panel
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub value: String,
    pub visibility: PanelVisibility,
    /// Times the panel was mounted; never exceeds 1
    pub mount_count: u32,
    pub accessibility: AccessibilityProps,
}

#[derive(Clone, Copy, Debug, Default)]
struct PanelRecord {
    visibility: PanelVisibility,
    mounts: u32,
}

struct TabsInner {
    value: ValueController<Option<String>>,
    tabs: Vec<TabItem>,
    roster: FocusRoster,
    orientation: Orientation,
    activation_mode: ActivationMode,
    loop_focus: bool,
    focused: Cell<Option<usize>>,
    panels: RefCell<FxHashMap<String, PanelRecord>>,
}

/// Headless tab group
///
/// Cloning yields another handle to the same group.
#[derive(Clone)]
pub struct TabGroup {
    inner: Rc<TabsInner>,
}

impl TabGroup {
    fn with_config(config: TabsConfig) -> Self {
        let props = config.props;
        let tabs = dedupe_tabs(props.tabs);
        let roster = FocusRoster::from_entries(tabs.iter().map(|tab| (tab.value.clone(), tab.disabled)));

        let panels: FxHashMap<String, PanelRecord> = tabs
            .iter()
            .map(|tab| {
                let record = if props.force_mount || tab.force_mount {
                    PanelRecord {
                        visibility: PanelVisibility::Hidden,
                        mounts: 1,
                    }
                } else {
                    PanelRecord::default()
                };
                (tab.value.clone(), record)
            })
            .collect();

        let controlled = config.controlled.or(props.value.map(Some));
        let value = ValueController::new(controlled, props.default_value)
            .on_change_shared(config.on_change);

        let group = Self {
            inner: Rc::new(TabsInner {
                value,
                tabs,
                roster,
                orientation: props.orientation,
                activation_mode: props.activation_mode,
                loop_focus: props.loop_focus,
                focused: Cell::new(None),
                panels: RefCell::new(panels),
            }),
        };
        group.reconcile_panels();
        group
    }

    /// Value of the active trigger
    pub fn value(&self) -> Option<String> {
        self.inner.value.current_value()
    }

    pub fn tabs(&self) -> &[TabItem] {
        &self.inner.tabs
    }

    pub fn orientation(&self) -> Orientation {
        self.inner.orientation
    }

    pub fn activation_mode(&self) -> ActivationMode {
        self.inner.activation_mode
    }

    /// Value of the trigger holding keyboard focus
    pub fn focused(&self) -> Option<String> {
        self.inner
            .focused
            .get()
            .and_then(|i| self.inner.roster.id_at(i))
            .map(str::to_string)
    }

    /// Per-render reconciliation; the outer `None` means the host passed no
    /// value at all
    pub fn sync_value(&self, value: Option<Option<String>>) {
        self.inner.value.sync(value);
        self.reconcile_panels();
    }

    /// Make `value` the active trigger; disabled or unknown triggers are
    /// ignored
    pub fn activate(&self, value: &str) {
        let Some(index) = self.inner.roster.index_of(value) else {
            tracing::debug!("unknown tab '{}' ignored", value);
            return;
        };
        if !self.inner.roster.is_enabled(index) {
            tracing::debug!("disabled tab '{}' ignored", value);
            return;
        }
        self.inner.value.request(Some(value.to_string()));
        self.reconcile_panels();
    }

    /// Host focus landed on a trigger
    pub fn focus(&self, value: &str) {
        if let Some(index) = self.inner.roster.index_of(value) {
            self.inner.focused.set(Some(index));
        }
    }

    pub fn blur(&self) {
        self.inner.focused.set(None);
    }

    /// Roving focus keyboard handling; returns whether the key was consumed
    pub fn key_down(&self, key: KeyCode) -> bool {
        let (next_key, prev_key) = self.inner.orientation.nav_keys();
        let movement = if key == next_key {
            RosterMove::Next
        } else if key == prev_key {
            RosterMove::Previous
        } else if key == KeyCode::HOME {
            RosterMove::First
        } else if key == KeyCode::END {
            RosterMove::Last
        } else if key.is_activation() {
            if let Some(value) = self.focused() {
                self.activate(&value);
            }
            return true;
        } else {
            return false;
        };

        let from = self.inner.focused.get().or_else(|| self.active_index());
        let Some(target) = self
            .inner
            .roster
            .resolve(from, movement, self.inner.loop_focus)
        else {
            return true;
        };
        self.inner.focused.set(Some(target));

        if self.inner.activation_mode == ActivationMode::Automatic {
            if let Some(value) = self.inner.roster.id_at(target).map(str::to_string) {
                self.activate(&value);
            }
        }
        true
    }

    pub fn panel_visibility(&self, value: &str) -> Option<PanelVisibility> {
        self.inner.panels.borrow().get(value).map(|p| p.visibility)
    }

    pub fn mount_count(&self, value: &str) -> u32 {
        self.inner.panels.borrow().get(value).map_or(0, |p| p.mounts)
    }

    pub fn list_accessibility(&self) -> AccessibilityProps {
        AccessibilityProps {
            orientation: Some(self.inner.orientation),
            ..AccessibilityProps::new(Role::TabList)
        }
    }

    pub fn triggers(&self) -> Vec<TriggerView> {
        let active = self.value();
        let focused = self.inner.focused.get();
        let tab_stop = self.tab_stop();

        self.inner
            .tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                let is_active = active.as_deref() == Some(tab.value.as_str());
                TriggerView {
                    value: tab.value.clone(),
                    label: tab.label.clone(),
                    disabled: tab.disabled,
                    active: is_active,
                    focused: focused == Some(index),
                    accessibility: AccessibilityProps {
                        id: Some(trigger_id(&tab.value)),
                        controls: Some(panel_id(&tab.value)),
                        selected: Some(is_active),
                        disabled: tab.disabled,
                        tab_index: Some(if tab_stop == Some(index) { 0 } else { -1 }),
                        data_state: Some(if is_active { "active" } else { "inactive" }),
                        ..AccessibilityProps::new(Role::Tab)
                    },
                }
            })
            .collect()
    }

    /// Panels that are currently mounted, in trigger order
    pub fn panels(&self) -> Vec<PanelView> {
        let panels = self.inner.panels.borrow();
        self.inner
            .tabs
            .iter()
            .filter_map(|tab| {
                let record = panels.get(&tab.value)?;
                if !record.visibility.is_mounted() {
                    return None;
                }
                let active = record.visibility == PanelVisibility::Active;
                Some(PanelView {
                    value: tab.value.clone(),
                    visibility: record.visibility,
                    mount_count: record.mounts,
                    accessibility: AccessibilityProps {
                        id: Some(panel_id(&tab.value)),
                        labelled_by: Some(trigger_id(&tab.value)),
                        hidden: !active,
                        tab_index: Some(0),
                        data_state: Some(if active { "active" } else { "inactive" }),
                        ..AccessibilityProps::new(Role::TabPanel)
                    },
                })
            })
            .collect()
    }

    fn active_index(&self) -> Option<usize> {
        self.value().and_then(|v| self.inner.roster.index_of(&v))
    }

    /// The trigger reachable with Tab: focused, else active, else first enabled
    fn tab_stop(&self) -> Option<usize> {
        let roster = &self.inner.roster;
        self.inner
            .focused
            .get()
            .or_else(|| self.active_index().filter(|&i| roster.is_enabled(i)))
            .or_else(|| roster.first())
    }

    fn reconcile_panels(&self) {
        let active = self.value();
        let mut panels = self.inner.panels.borrow_mut();
        for (value, record) in panels.iter_mut() {
            let event = if active.as_deref() == Some(value.as_str()) {
                tab_events::ACTIVATE
            } else {
                tab_events::DEACTIVATE
            };
            let was_mounted = record.visibility.is_mounted();
            if record.visibility.apply(event) && !was_mounted {
                record.mounts += 1;
                tracing::debug!("tab panel '{}' mounted", value);
            }
        }
    }
}

impl std::fmt::Debug for TabGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabGroup")
            .field("value", &self.value())
            .field("focused", &self.focused())
            .finish()
    }
}

fn trigger_id(value: &str) -> String {
    format!("tab-{}", value)
}

fn panel_id(value: &str) -> String {
    format!("panel-{}", value)
}

fn dedupe_tabs(tabs: Vec<TabItem>) -> Vec<TabItem> {
    let mut kept: Vec<TabItem> = Vec::with_capacity(tabs.len());
    for tab in tabs {
        if kept.iter().any(|k| k.value == tab.value) {
            tracing::warn!("duplicate tab '{}' ignored", tab.value);
            continue;
        }
        kept.push(tab);
    }
    kept
}

/// Internal configuration for building a TabGroup
#[derive(Clone, Default)]
struct TabsConfig {
    props: TabsProps,
    controlled: Option<Option<String>>,
    on_change: Option<ChangeCallback<Option<String>>>,
}

/// Builder for creating TabGroup controls with fluent API
pub struct TabsBuilder {
    config: TabsConfig,
}

impl TabsBuilder {
    pub fn new() -> Self {
        Self {
            config: TabsConfig::default(),
        }
    }

    pub fn from_props(props: TabsProps) -> Self {
        Self {
            config: TabsConfig {
                props,
                ..Default::default()
            },
        }
    }

    /// Controlled value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.config.controlled = Some(Some(value.into()));
        self
    }

    /// Controlled value that may be empty
    pub fn controlled(mut self, value: Option<String>) -> Self {
        self.config.controlled = Some(value);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.config.props.default_value = Some(value.into());
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.props.orientation = orientation;
        self
    }

    pub fn vertical(self) -> Self {
        self.orientation(Orientation::Vertical)
    }

    pub fn activation_mode(mut self, mode: ActivationMode) -> Self {
        self.config.props.activation_mode = mode;
        self
    }

    /// Wrap roving focus at either end (default: true)
    pub fn loop_focus(mut self, loop_focus: bool) -> Self {
        self.config.props.loop_focus = loop_focus;
        self
    }

    /// Mount every panel from the start
    pub fn force_mount(mut self, force_mount: bool) -> Self {
        self.config.props.force_mount = force_mount;
        self
    }

    pub fn tab(self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.item(TabItem::new(value, label))
    }

    pub fn item(mut self, item: TabItem) -> Self {
        self.config.props.tabs.push(item);
        self
    }

    /// Set the change callback
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        self.config.on_change = Some(Rc::new(move |value: &Option<String>| {
            if let Some(value) = value {
                callback(value)
            }
        }));
        self
    }

    pub fn build(self) -> TabGroup {
        TabGroup::with_config(self.config)
    }
}

impl Default for TabsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a tabs builder
pub fn tabs() -> TabsBuilder {
    TabsBuilder::new()
}
