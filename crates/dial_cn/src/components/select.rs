//! Select (listbox) component
//!
//! A trigger that opens a list of options. While open, a capture-phase
//! document listener watches for presses outside the control's root element
//! and closes it; the listener only exists while the list is open.
//!
//! # Example
//!
//! ```rust
//! use dial_cn::prelude::*;
//!
//! let hub = ListenerHub::new();
//! let model = cn::select()
//!     .placeholder("Choose a model")
//!     .option("gpt", "GPT")
//!     .option("gemini", "Gemini")
//!     .option("claude", "Claude")
//!     .build(&hub);
//!
//! assert_eq!(model.display_label(), "Choose a model");
//!
//! model.open();
//! model.key_down(KeyCode::ARROW_DOWN);
//! model.key_down(KeyCode::ENTER);
//!
//! assert_eq!(model.value().as_deref(), Some("gemini"));
//! assert!(!model.is_open());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dial_core::a11y::{AccessibilityProps, Role};
use dial_core::controllable::{ChangeCallback, ValueController};
use dial_core::events::{event_types, ElementId, KeyCode};
use dial_core::form::FormField;
use dial_core::fsm::StateTransitions;
use dial_core::listeners::{ListenerHub, Subscription};
use dial_core::roster::{FocusRoster, RosterMove};
use rustc_hash::FxHashSet;

/// Select-local FSM events
pub mod select_events {
    pub const OPEN: u32 = 30101;
    pub const CLOSE: u32 = 30102;
    /// Pointer pressed outside the control's root element
    pub const OUTSIDE_PRESS: u32 = 30103;
    pub const ESCAPE: u32 = 30104;
    /// An option was chosen
    pub const SELECT: u32 = 30105;
    pub const DISABLE: u32 = 30106;
    pub const ENABLE: u32 = 30107;
}

/// Select popover states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectState {
    #[default]
    Closed,
    Open,
    /// Ignores interaction until the host re-enables it
    Disabled,
}

impl SelectState {
    pub fn is_open(&self) -> bool {
        matches!(self, SelectState::Open)
    }
}

impl StateTransitions for SelectState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use select_events::*;
        use SelectState::*;

        match (self, event) {
            (Closed, OPEN) => Some(Open),
            (Open, CLOSE) | (Open, OUTSIDE_PRESS) | (Open, ESCAPE) | (Open, SELECT) => {
                Some(Closed)
            }
            (Closed | Open, DISABLE) => Some(Disabled),
            (Disabled, ENABLE) => Some(Closed),
            _ => None,
        }
    }
}

/// A selectable option
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// One row of the option list
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
pub enum SelectEntry {
    Option(SelectOption),
    /// Group heading
    Label { text: String },
    Separator,
}

/// Plain-data select configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SelectProps {
    /// Controlled value; latches controlled mode when present
    pub value: Option<String>,
    pub default_value: Option<String>,
    pub disabled: bool,
    pub placeholder: String,
    pub name: Option<String>,
    pub entries: Vec<SelectEntry>,
}

impl Default for SelectProps {
    fn default() -> Self {
        Self {
            value: None,
            default_value: None,
            disabled: false,
            placeholder: "Select an option".to_string(),
            name: None,
            entries: Vec::new(),
        }
    }
}

/// A rendered row of open content
#[derive(Clone, Debug, PartialEq)]
pub enum EntryView {
    Option {
        value: String,
        label: String,
        disabled: bool,
        selected: bool,
        highlighted: bool,
        accessibility: AccessibilityProps,
    },
    /// Group heading
    Label {
        text: String,
        accessibility: AccessibilityProps,
    },
    Separator {
        accessibility: AccessibilityProps,
    },
}

/// Open list content; only exists while the select is open
#[derive(Clone, Debug, PartialEq)]
pub struct SelectContent {
    pub entries: Vec<EntryView>,
    pub accessibility: AccessibilityProps,
}

struct SelectInner {
    hub: ListenerHub,
    root: ElementId,
    value: ValueController<Option<String>>,
    entries: Vec<SelectEntry>,
    /// Options only, in list order
    roster: FocusRoster,
    placeholder: String,
    name: Option<String>,
    state: Cell<SelectState>,
    highlighted: Cell<Option<usize>>,
    outside_press: RefCell<Option<Subscription>>,
}

/// Headless select
///
/// Cloning yields another handle to the same control.
#[derive(Clone)]
pub struct ListboxSelect {
    inner: Rc<SelectInner>,
}

impl ListboxSelect {
    fn with_config(hub: &ListenerHub, config: SelectConfig) -> Self {
        let props = config.props;
        let entries = dedupe_options(props.entries);
        let roster = FocusRoster::from_entries(entries.iter().filter_map(|entry| match entry {
            SelectEntry::Option(option) => Some((option.value.clone(), option.disabled)),
            _ => None,
        }));
        let controlled = config.controlled.or(props.value.map(Some));
        let value = ValueController::new(controlled, props.default_value)
            .on_change_shared(config.on_change);
        let state = if props.disabled {
            SelectState::Disabled
        } else {
            SelectState::Closed
        };

        Self {
            inner: Rc::new(SelectInner {
                hub: hub.clone(),
                root: config.root.unwrap_or_else(ElementId::next),
                value,
                entries,
                roster,
                placeholder: props.placeholder,
                name: props.name,
                state: Cell::new(state),
                highlighted: Cell::new(None),
                outside_press: RefCell::new(None),
            }),
        }
    }

    /// Element the host must put around trigger and content
    pub fn root_id(&self) -> ElementId {
        self.inner.root
    }

    pub fn value(&self) -> Option<String> {
        self.inner.value.current_value()
    }

    pub fn state(&self) -> SelectState {
        self.inner.state.get()
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    pub fn is_disabled(&self) -> bool {
        self.state() == SelectState::Disabled
    }

    /// Per-render reconciliation; the outer `None` means the host passed no
    /// value at all
    pub fn sync_value(&self, value: Option<Option<String>>) {
        self.inner.value.sync(value);
    }

    pub fn options(&self) -> impl Iterator<Item = &SelectOption> + '_ {
        self.inner.entries.iter().filter_map(|entry| match entry {
            SelectEntry::Option(option) => Some(option),
            _ => None,
        })
    }

    /// Text for the trigger: the selected option's label, or the placeholder
    pub fn display_label(&self) -> String {
        match self.value() {
            Some(value) => self
                .options()
                .find(|option| option.value == value)
                .map(|option| option.label.clone())
                .unwrap_or(value),
            None => self.inner.placeholder.clone(),
        }
    }

    /// Value of the highlighted option while open
    pub fn highlighted(&self) -> Option<String> {
        self.inner
            .highlighted
            .get()
            .and_then(|i| self.inner.roster.id_at(i))
            .map(str::to_string)
    }

    pub fn open(&self) {
        if self.state() != SelectState::Closed {
            return;
        }
        self.transition(select_events::OPEN);

        let root = self.inner.root;
        let weak = Rc::downgrade(&self.inner);
        let subscription = self
            .inner
            .hub
            .subscribe_capture(event_types::POINTER_DOWN, move |event| {
                if event.is_within(root) {
                    return;
                }
                if let Some(inner) = weak.upgrade() {
                    ListboxSelect { inner }.close_with(select_events::OUTSIDE_PRESS);
                }
            });
        *self.inner.outside_press.borrow_mut() = Some(subscription);

        let roster = &self.inner.roster;
        let selected = self
            .value()
            .and_then(|value| roster.index_of(&value))
            .filter(|&i| roster.is_enabled(i));
        self.inner.highlighted.set(selected.or_else(|| roster.first()));
    }

    pub fn close(&self) {
        self.close_with(select_events::CLOSE);
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Choose `value` and close; disabled or unknown options are ignored
    pub fn select_option(&self, value: &str) {
        if self.is_disabled() {
            return;
        }
        match self.options().find(|option| option.value == value) {
            Some(option) if !option.disabled => {}
            Some(_) => {
                tracing::debug!("disabled option '{}' ignored", value);
                return;
            }
            None => {
                tracing::debug!("unknown option '{}' ignored", value);
                return;
            }
        }
        self.inner.value.request(Some(value.to_string()));
        self.close_with(select_events::SELECT);
    }

    /// Move the highlight to `value` (pointer hover)
    pub fn highlight(&self, value: &str) {
        if !self.is_open() {
            return;
        }
        if let Some(index) = self.inner.roster.index_of(value) {
            if self.inner.roster.is_enabled(index) {
                self.inner.highlighted.set(Some(index));
            }
        }
    }

    /// Listbox keyboard handling; returns whether the key was consumed
    pub fn key_down(&self, key: KeyCode) -> bool {
        match self.state() {
            SelectState::Disabled => false,
            SelectState::Closed => match key {
                KeyCode::ENTER | KeyCode::SPACE | KeyCode::ARROW_DOWN | KeyCode::ARROW_UP => {
                    self.open();
                    true
                }
                _ => false,
            },
            SelectState::Open => match key {
                KeyCode::ARROW_DOWN => self.move_highlight(RosterMove::Next),
                KeyCode::ARROW_UP => self.move_highlight(RosterMove::Previous),
                KeyCode::HOME => self.move_highlight(RosterMove::First),
                KeyCode::END => self.move_highlight(RosterMove::Last),
                KeyCode::ENTER | KeyCode::SPACE => {
                    match self.highlighted() {
                        Some(value) => self.select_option(&value),
                        None => self.close(),
                    }
                    true
                }
                KeyCode::ESCAPE => {
                    self.close_with(select_events::ESCAPE);
                    true
                }
                KeyCode::TAB => {
                    // Focus moves on; the key is not consumed
                    self.close();
                    false
                }
                _ => false,
            },
        }
    }

    pub fn set_disabled(&self, disabled: bool) {
        if disabled {
            self.release_open_state();
            self.transition(select_events::DISABLE);
        } else {
            self.transition(select_events::ENABLE);
        }
    }

    /// List content, `None` while closed
    pub fn content(&self) -> Option<SelectContent> {
        if !self.is_open() {
            return None;
        }
        let selected = self.value();
        let highlighted = self.highlighted();
        let entries = self
            .inner
            .entries
            .iter()
            .map(|entry| match entry {
                SelectEntry::Option(option) => {
                    let is_selected = selected.as_deref() == Some(option.value.as_str());
                    EntryView::Option {
                        value: option.value.clone(),
                        label: option.label.clone(),
                        disabled: option.disabled,
                        selected: is_selected,
                        highlighted: highlighted.as_deref() == Some(option.value.as_str()),
                        accessibility: AccessibilityProps {
                            selected: Some(is_selected),
                            disabled: option.disabled,
                            data_state: Some(if is_selected { "checked" } else { "unchecked" }),
                            ..AccessibilityProps::new(Role::Option)
                        },
                    }
                }
                SelectEntry::Label { text } => EntryView::Label {
                    text: text.clone(),
                    accessibility: AccessibilityProps {
                        label: Some(text.clone()),
                        ..AccessibilityProps::new(Role::Group)
                    },
                },
                SelectEntry::Separator => EntryView::Separator {
                    accessibility: AccessibilityProps::new(Role::Separator),
                },
            })
            .collect();

        Some(SelectContent {
            entries,
            accessibility: AccessibilityProps::new(Role::Listbox),
        })
    }

    pub fn trigger_accessibility(&self) -> AccessibilityProps {
        let open = self.is_open();
        AccessibilityProps {
            expanded: Some(open),
            has_popup: Some("listbox"),
            disabled: self.is_disabled(),
            data_state: Some(if open { "open" } else { "closed" }),
            ..AccessibilityProps::new(Role::Combobox)
        }
    }

    /// Hidden input carrying the selected value
    pub fn form_field(&self) -> Option<FormField> {
        let name = self.inner.name.as_ref()?;
        Some(
            FormField::hidden(name.clone(), self.value().unwrap_or_default())
                .disabled(self.is_disabled()),
        )
    }

    fn move_highlight(&self, movement: RosterMove) -> bool {
        let next = self
            .inner
            .roster
            .resolve(self.inner.highlighted.get(), movement, false);
        if next.is_some() {
            self.inner.highlighted.set(next);
        }
        true
    }

    fn close_with(&self, event: u32) {
        if !self.is_open() {
            return;
        }
        self.release_open_state();
        self.transition(event);
    }

    fn release_open_state(&self) {
        self.inner.outside_press.borrow_mut().take();
        self.inner.highlighted.set(None);
    }

    fn transition(&self, event: u32) {
        let mut state = self.inner.state.get();
        if state.apply(event) {
            self.inner.state.set(state);
        }
    }
}

impl std::fmt::Debug for ListboxSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListboxSelect")
            .field("value", &self.value())
            .field("state", &self.state())
            .finish()
    }
}

/// Keep the first option for each value
fn dedupe_options(entries: Vec<SelectEntry>) -> Vec<SelectEntry> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    entries
        .into_iter()
        .filter(|entry| match entry {
            SelectEntry::Option(option) => {
                if seen.insert(option.value.clone()) {
                    true
                } else {
                    tracing::warn!("duplicate select option '{}' ignored", option.value);
                    false
                }
            }
            _ => true,
        })
        .collect()
}

/// Internal configuration for building a ListboxSelect
#[derive(Clone, Default)]
struct SelectConfig {
    props: SelectProps,
    /// Controlled value including "controlled, nothing selected"
    controlled: Option<Option<String>>,
    root: Option<ElementId>,
    on_change: Option<ChangeCallback<Option<String>>>,
}

/// Builder for creating ListboxSelect controls with fluent API
pub struct SelectBuilder {
    config: SelectConfig,
}

impl SelectBuilder {
    pub fn new() -> Self {
        Self {
            config: SelectConfig::default(),
        }
    }

    pub fn from_props(props: SelectProps) -> Self {
        Self {
            config: SelectConfig {
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

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.props.disabled = disabled;
        self
    }

    /// Trigger text while nothing is selected (default: "Select an option")
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.props.placeholder = placeholder.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.props.name = Some(name.into());
        self
    }

    /// Element id of the control's root, used for outside-press detection
    pub fn root(mut self, root: ElementId) -> Self {
        self.config.root = Some(root);
        self
    }

    pub fn option(self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.entry(SelectEntry::Option(SelectOption::new(value, label)))
    }

    pub fn disabled_option(self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.entry(SelectEntry::Option(
            SelectOption::new(value, label).disabled(true),
        ))
    }

    /// A labelled group of options
    pub fn group(
        mut self,
        label: impl Into<String>,
        options: impl IntoIterator<Item = SelectOption>,
    ) -> Self {
        self = self.entry(SelectEntry::Label { text: label.into() });
        for option in options {
            self = self.entry(SelectEntry::Option(option));
        }
        self
    }

    pub fn separator(self) -> Self {
        self.entry(SelectEntry::Separator)
    }

    pub fn entry(mut self, entry: SelectEntry) -> Self {
        self.config.props.entries.push(entry);
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

    pub fn build(self, hub: &ListenerHub) -> ListboxSelect {
        ListboxSelect::with_config(hub, self.config)
    }
}

impl Default for SelectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a select builder
pub fn select() -> SelectBuilder {
    SelectBuilder::new()
}
