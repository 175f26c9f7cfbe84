//! Keyboard stepping over enabled options.
//!
//! Positions are indices into the list of *enabled* options, so disabled
//! options are never landed on.

use crate::events::Key;
use crate::source::OptionInfo;

/// A keyboard navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigation {
    Previous,
    Next,
    /// Step back by the given page size, stopping at the first option.
    PageUp(usize),
    /// Step forward by the given page size, stopping at the last option.
    PageDown(usize),
    First,
    Last,
}

impl Navigation {
    /// The step bound to `key`, if any.
    pub fn from_key(key: Key, page_size: usize) -> Option<Self> {
        match key {
            Key::ArrowUp => Some(Self::Previous),
            Key::ArrowDown => Some(Self::Next),
            Key::PageUp => Some(Self::PageUp(page_size)),
            Key::PageDown => Some(Self::PageDown(page_size)),
            Key::Home => Some(Self::First),
            Key::End => Some(Self::Last),
            _ => None,
        }
    }

    /// Target position among `len` enabled options, starting from `current`
    /// (`None` when no enabled option is selected).
    ///
    /// Stepping past either end yields `None` for single steps and clamps
    /// for page steps.
    pub fn target(self, len: usize, current: Option<usize>) -> Option<usize> {
        let last = len.checked_sub(1)?;
        match (self, current) {
            (Self::Previous, Some(current)) => current.checked_sub(1),
            (Self::Previous, None) => None,
            (Self::Next, Some(current)) => (current < last).then_some(current + 1),
            (Self::Next, None) => Some(0),
            (Self::PageUp(step), Some(current)) => Some(current.saturating_sub(step)),
            (Self::PageUp(_), None) => Some(0),
            (Self::PageDown(step), Some(current)) => Some(current.saturating_add(step).min(last)),
            (Self::PageDown(step), None) => Some(step.saturating_sub(1).min(last)),
            (Self::First, _) => Some(0),
            (Self::Last, _) => Some(last),
        }
    }

    /// The option this step lands on, if it differs from the current one.
    pub fn resolve(self, options: &[OptionInfo]) -> Option<&OptionInfo> {
        let enabled: Vec<&OptionInfo> = options.iter().filter(|option| option.enabled).collect();
        let current = enabled.iter().position(|option| option.selected);
        let target = self.target(enabled.len(), current)?;
        (Some(target) != current).then(|| enabled[target])
    }
}
