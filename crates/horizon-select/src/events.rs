//! Input events delivered to the select by its host.
//!
//! The host translates platform events into these types and feeds them to
//! [`Select`](crate::Select). Handlers answer with an [`EventDisposition`]
//! telling the host whether to suppress the platform default action or stop
//! propagation.

use crate::mirror::MirrorId;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta key is held (Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if a command modifier (Ctrl, Alt or Meta) is pressed.
    ///
    /// Shift is not a command modifier; it only changes the typed character.
    pub fn any_command(&self) -> bool {
        self.control || self.alt || self.meta
    }
}

/// Keys the select reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Escape,
    Space,
    Tab,
    Backspace,
    /// Any other key; printable input is carried in [`KeyPressEvent::text`].
    Other,
}

/// Key press event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPressEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// The text input from this key press (if any).
    ///
    /// For printable keys this is the character that would be typed, for
    /// non-printable keys it is empty.
    pub text: String,
}

impl KeyPressEvent {
    /// Create a new key press event.
    pub fn new(key: Key, modifiers: KeyboardModifiers, text: impl Into<String>) -> Self {
        Self {
            key,
            modifiers,
            text: text.into(),
        }
    }

    /// A non-printable key pressed without modifiers.
    pub fn key(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE, "")
    }

    /// A non-printable key pressed with modifiers.
    pub fn with_modifiers(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self::new(key, modifiers, "")
    }

    /// A printable character typed without command modifiers.
    pub fn character(ch: char) -> Self {
        let key = if ch == ' ' { Key::Space } else { Key::Other };
        Self::new(key, KeyboardModifiers::NONE, ch.to_string())
    }

    /// The typed character, if this is a single printable code point entered
    /// without Ctrl, Alt or Meta.
    pub fn printable_char(&self) -> Option<char> {
        if self.modifiers.any_command() {
            return None;
        }
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}

/// Where an event originated, relative to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTarget {
    /// The widget's own UI (the button area, or the list area of a multi-select).
    Ui,
    /// The floating dropdown panel.
    Dropdown,
    /// A `<label>` element.
    Label(LabelTarget),
    /// Anything else in the document.
    Outside,
}

impl EventTarget {
    /// Whether the target lies inside the widget's own UI.
    pub fn is_ui(&self) -> bool {
        matches!(self, Self::Ui)
    }
}

/// A label element that received a click.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelTarget {
    /// The label's `for` attribute.
    pub html_for: Option<String>,
    /// Whether the label contains the native list element.
    pub contains_list: bool,
}

/// Kinds of pointer interaction on the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    /// Primary button pressed.
    MouseDown,
    /// Touch started.
    TouchStart,
    /// Primary button clicked.
    Click,
}

/// A pointer interaction with the widget's UI or its dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub kind: UiEventKind,
    pub target: EventTarget,
}

impl UiEvent {
    pub fn new(kind: UiEventKind, target: EventTarget) -> Self {
        Self { kind, target }
    }

    /// Whether this is a press (mouse down or touch start).
    pub fn is_press(&self) -> bool {
        matches!(self.kind, UiEventKind::MouseDown | UiEventKind::TouchStart)
    }
}

/// Kinds of document-level events the widget listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentEventKind {
    /// Primary button released anywhere.
    MouseUp,
    /// Click that was not stopped by the widget.
    Click,
}

/// A document-level event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEvent {
    pub kind: DocumentEventKind,
    pub target: EventTarget,
}

impl DocumentEvent {
    pub fn new(kind: DocumentEventKind, target: EventTarget) -> Self {
        Self { kind, target }
    }
}

/// What the pointer is over inside the options view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerTarget {
    /// A rendered mirror node.
    Item(MirrorId),
    /// Above the first item (the list is being dragged past its start).
    AboveItems,
    /// Below the last item (the list is being dragged past its end).
    BelowItems,
    /// Not over the options view.
    Outside,
}

/// How the host should treat an event after the widget handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct EventDisposition {
    /// Suppress the platform default action.
    pub prevent_default: bool,
    /// Stop further propagation.
    pub stop_propagation: bool,
}

impl EventDisposition {
    /// The widget did not claim the event.
    pub const IGNORED: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };

    /// Suppress the default action only.
    pub const PREVENT_DEFAULT: Self = Self {
        prevent_default: true,
        stop_propagation: false,
    };

    /// Stop propagation only.
    pub const STOP_PROPAGATION: Self = Self {
        prevent_default: false,
        stop_propagation: true,
    };

    /// Merge two dispositions.
    pub fn merge(self, other: Self) -> Self {
        Self {
            prevent_default: self.prevent_default || other.prevent_default,
            stop_propagation: self.stop_propagation || other.stop_propagation,
        }
    }
}
