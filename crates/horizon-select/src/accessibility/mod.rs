//! Accessibility vocabulary shared by the strategies.
//!
//! - [`AccessibleRole`]: ARIA roles the select exposes
//! - [`AttributeMap`]: an ordered attribute set with diffing, used for meta
//!   attributes, ready notifications and the managed ARIA UI model
//! - [`names`]: attribute names the select writes

mod attributes;
mod role;

pub use attributes::{AttributeDiff, AttributeMap};
pub use role::AccessibleRole;

/// Attribute names written by the select.
pub mod names {
    /// Set on the root once the select is initialized.
    pub const READY: &str = "data-horizon-select-ready";
    /// Set on the root of single-selects.
    pub const SINGLE: &str = "data-horizon-select-single";
    /// Marks touch-only devices; `"ios"` on iOS, empty elsewhere.
    pub const TOUCH_ONLY: &str = "data-horizon-select-touch-only";
    /// Marks the managed ARIA strategy.
    pub const MANAGED_ARIA: &str = "data-horizon-select-managed-aria";

    pub const ROLE: &str = "role";
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const TABINDEX: &str = "tabindex";
    pub const ARIA_LABEL: &str = "aria-label";
    pub const ARIA_EXPANDED: &str = "aria-expanded";
    pub const ARIA_DISABLED: &str = "aria-disabled";
    pub const ARIA_HIDDEN: &str = "aria-hidden";
    pub const ARIA_AUTOCOMPLETE: &str = "aria-autocomplete";
    pub const ARIA_OWNS: &str = "aria-owns";
    pub const ARIA_HASPOPUP: &str = "aria-haspopup";
    pub const ARIA_ACTIVEDESCENDANT: &str = "aria-activedescendant";
    pub const ARIA_LABELLEDBY: &str = "aria-labelledby";
}
