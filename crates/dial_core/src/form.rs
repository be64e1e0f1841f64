//! Hidden form fields mirroring control values
//!
//! Headless controls have no native input of their own, so each one that
//! takes a `name` describes the hidden inputs a host should render inside a
//! form for plain form submission to keep working.

/// Kind of hidden input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// `<input type="hidden">`
    Hidden,
    /// Visually hidden `<input type="checkbox">`
    Checkbox,
}

/// One hidden input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub kind: InputKind,
    pub name: String,
    pub value: String,
    /// Checkbox only
    pub checked: bool,
    pub disabled: bool,
    pub required: bool,
}

impl FormField {
    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: InputKind::Hidden,
            name: name.into(),
            value: value.into(),
            checked: false,
            disabled: false,
            required: false,
        }
    }

    pub fn checkbox(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
        Self {
            kind: InputKind::Checkbox,
            checked,
            ..Self::hidden(name, value)
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The `(name, value)` pair a form submission would carry, if any
    ///
    /// Disabled fields and unchecked checkboxes are not submitted.
    pub fn submission(&self) -> Option<(&str, &str)> {
        if self.disabled || (self.kind == InputKind::Checkbox && !self.checked) {
            return None;
        }
        Some((self.name.as_str(), self.value.as_str()))
    }
}
