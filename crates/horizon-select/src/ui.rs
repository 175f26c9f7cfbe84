//! External collaborators the select drives.
//!
//! The engine never renders anything itself. The host implements these
//! traits over its real UI, and tests implement them with recorders.

/// The widget's visual layer.
pub trait SelectUi {
    /// Show or hide the dropdown.
    fn set_open(&mut self, open: bool);
    /// Show or hide the focus indication.
    fn set_focus(&mut self, focused: bool);
}

/// Elements of the widget that can hold platform focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The native list element.
    NativeSelect,
    /// The combobox button rendered by the managed ARIA strategy.
    AriaButton,
}

/// Access to platform focus.
pub trait FocusHost {
    /// The widget element that currently holds focus, if any.
    fn focused(&self) -> Option<FocusTarget>;
    /// Move focus to `target`.
    fn focus(&mut self, target: FocusTarget);
}

/// Vertical placement chosen by the dropdown coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    /// The dropdown opens above the control.
    Top,
    /// The dropdown opens below the control.
    Bottom,
}

/// Settings forwarded when the dropdown is anchored.
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownSettings {
    /// Minimum space below the control before opening upwards.
    pub min_bottom_space: f32,
    /// Class name applied to the dropdown panel.
    pub class_name: String,
}

/// Positions the floating dropdown relative to the control.
///
/// Alignment changes are reported back through
/// [`Select::on_alignment_changed`](crate::Select::on_alignment_changed).
pub trait DropdownCoordinator {
    /// Anchor the dropdown to the control.
    fn set_anchor(&mut self, settings: &DropdownSettings);
    /// Detach the dropdown.
    fn clear_anchor(&mut self);
}
