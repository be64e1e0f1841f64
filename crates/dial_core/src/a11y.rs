//! Accessibility contract exposed by every control part
//!
//! Controls describe each part (trigger, thumb, option, panel) with an
//! [`AccessibilityProps`]; the host copies [`AccessibilityProps::attributes`]
//! onto its element or translates them to a native accessibility tree.

use crate::events::Orientation;

/// ARIA role of a control part
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Slider,
    Combobox,
    Listbox,
    Option,
    Group,
    Separator,
    TabList,
    Tab,
    TabPanel,
    Switch,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Slider => "slider",
            Role::Combobox => "combobox",
            Role::Listbox => "listbox",
            Role::Option => "option",
            Role::Group => "group",
            Role::Separator => "separator",
            Role::TabList => "tablist",
            Role::Tab => "tab",
            Role::TabPanel => "tabpanel",
            Role::Switch => "switch",
        }
    }
}

/// Accessible state of one control part
///
/// Unset fields are omitted from [`attributes`](Self::attributes).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccessibilityProps {
    pub role: Option<Role>,
    pub id: Option<String>,
    pub label: Option<String>,
    pub labelled_by: Option<String>,
    pub controls: Option<String>,
    pub orientation: Option<Orientation>,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
    pub value_now: Option<f64>,
    pub checked: Option<bool>,
    pub selected: Option<bool>,
    pub expanded: Option<bool>,
    /// `aria-haspopup` kind, e.g. `"listbox"`
    pub has_popup: Option<&'static str>,
    pub required: Option<bool>,
    pub disabled: bool,
    pub hidden: bool,
    pub tab_index: Option<i32>,
    /// Styling hook (`data-state`), e.g. `"open"`, `"active"`, `"checked"`
    pub data_state: Option<&'static str>,
}

impl AccessibilityProps {
    pub fn new(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    /// Flatten into `(attribute, value)` pairs in a stable order
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if let Some(role) = self.role {
            attrs.push(("role", role.as_str().to_string()));
        }
        if let Some(id) = &self.id {
            attrs.push(("id", id.clone()));
        }
        if let Some(label) = &self.label {
            attrs.push(("aria-label", label.clone()));
        }
        if let Some(labelled_by) = &self.labelled_by {
            attrs.push(("aria-labelledby", labelled_by.clone()));
        }
        if let Some(controls) = &self.controls {
            attrs.push(("aria-controls", controls.clone()));
        }
        if let Some(orientation) = self.orientation {
            attrs.push(("aria-orientation", orientation.as_str().to_string()));
        }
        if let Some(min) = self.value_min {
            attrs.push(("aria-valuemin", min.to_string()));
        }
        if let Some(max) = self.value_max {
            attrs.push(("aria-valuemax", max.to_string()));
        }
        if let Some(now) = self.value_now {
            attrs.push(("aria-valuenow", now.to_string()));
        }
        if let Some(checked) = self.checked {
            attrs.push(("aria-checked", checked.to_string()));
        }
        if let Some(selected) = self.selected {
            attrs.push(("aria-selected", selected.to_string()));
        }
        if let Some(expanded) = self.expanded {
            attrs.push(("aria-expanded", expanded.to_string()));
        }
        if let Some(popup) = self.has_popup {
            attrs.push(("aria-haspopup", popup.to_string()));
        }
        if let Some(required) = self.required {
            attrs.push(("aria-required", required.to_string()));
        }
        if self.disabled {
            attrs.push(("aria-disabled", "true".to_string()));
        }
        if self.hidden {
            attrs.push(("hidden", String::new()));
        }
        if let Some(tab_index) = self.tab_index {
            attrs.push(("tabindex", tab_index.to_string()));
        }
        if let Some(state) = self.data_state {
            attrs.push(("data-state", state.to_string()));
        }
        attrs
    }

    /// Value of one attribute, if present
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_are_omitted() {
        let props = AccessibilityProps::new(Role::Switch);
        assert_eq!(props.attributes(), vec![("role", "switch".to_string())]);
    }

    #[test]
    fn test_slider_attributes() {
        let props = AccessibilityProps {
            value_min: Some(0.0),
            value_max: Some(100.0),
            value_now: Some(42.5),
            orientation: Some(Orientation::Vertical),
            tab_index: Some(0),
            ..AccessibilityProps::new(Role::Slider)
        };
        assert_eq!(props.attribute("aria-valuemax").as_deref(), Some("100"));
        assert_eq!(props.attribute("aria-valuenow").as_deref(), Some("42.5"));
        assert_eq!(props.attribute("aria-orientation").as_deref(), Some("vertical"));
        assert_eq!(props.attribute("aria-disabled"), None);
    }
}
