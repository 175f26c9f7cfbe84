//! ARIA roles.

/// The accessibility role of an element rendered by the select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessibleRole {
    /// The managed combobox button.
    Combobox,
    /// The managed option list.
    Listbox,
    /// One managed option.
    Option,
    /// A widget handling its own keyboard input.
    ///
    /// Given to multi-selects so screen readers pass keys through.
    Application,
}

impl AccessibleRole {
    /// The ARIA `role` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            AccessibleRole::Combobox => "combobox",
            AccessibleRole::Listbox => "listbox",
            AccessibleRole::Option => "option",
            AccessibleRole::Application => "application",
        }
    }
}

impl std::fmt::Display for AccessibleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
