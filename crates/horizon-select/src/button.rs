//! State of the collapsed select button.

use horizon_select_core::{Property, Signal};

use crate::source::SourceList;
use crate::ui::VerticalAlignment;

/// What the button shows: the selected option's text, plus disabled, open
/// and opening-direction markers.
#[derive(Default)]
pub struct ButtonState {
    label: Property<String>,
    disabled: Property<bool>,
    open: Property<bool>,
    open_at_top: Property<bool>,
    /// Emitted with the new label whenever it changes.
    pub label_changed: Signal<String>,
}

impl std::fmt::Debug for ButtonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonState")
            .field("label", &self.label())
            .field("disabled", &self.is_disabled())
            .field("open", &self.is_open())
            .field("open_at_top", &self.is_open_at_top())
            .finish()
    }
}

impl ButtonState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read label and disabled state from `list`.
    pub fn refresh(&self, list: &SourceList) {
        let label = list
            .selected_option()
            .map(|option| option.text)
            .unwrap_or_default();
        if self.label.set(label.clone()) {
            self.label_changed.emit(label);
        }
        self.disabled.set(list.is_disabled());
    }

    /// Closing also clears the opening direction.
    pub fn set_open(&self, open: bool) {
        self.open.set(open);
        if !open {
            self.open_at_top.set(false);
        }
    }

    pub fn set_opening_position(&self, alignment: VerticalAlignment) {
        self.open_at_top.set(alignment == VerticalAlignment::Top);
    }

    pub fn label(&self) -> String {
        self.label.get()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn is_open_at_top(&self) -> bool {
        self.open_at_top.get()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_label_follows_selection() {
        let list = SourceList::with_options(["Apple", "Pear"]);
        let button = ButtonState::new();
        let emitted = Arc::new(AtomicUsize::new(0));
        let counter = emitted.clone();
        button.label_changed.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        button.refresh(&list);
        assert_eq!(button.label(), "Apple");
        button.refresh(&list);
        assert_eq!(emitted.load(Ordering::SeqCst), 1);

        list.set_selected_index(Some(1));
        button.refresh(&list);
        assert_eq!(button.label(), "Pear");

        list.clear().unwrap();
        button.refresh(&list);
        assert_eq!(button.label(), "");
        assert_eq!(emitted.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_closing_clears_open_at_top() {
        let button = ButtonState::new();
        button.set_open(true);
        button.set_opening_position(VerticalAlignment::Top);
        assert!(button.is_open_at_top());

        button.set_open(false);
        assert!(!button.is_open());
        assert!(!button.is_open_at_top());
    }
}
