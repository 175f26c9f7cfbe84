//! Commonly used types for embedding a select:
//!
//! ```
//! use horizon_select::prelude::*;
//! ```

// ============================================================================
// Composition root
// ============================================================================

pub use crate::select::{ReadyEvent, Select, StyleRegistry};
pub use crate::{ConfigError, SelectConfig, SelectError};

// ============================================================================
// Source list
// ============================================================================

pub use crate::source::{GroupSpec, NodeKey, OptionSpec, SourceList};

// ============================================================================
// Host integration
// ============================================================================

pub use crate::events::{
    DocumentEvent, DocumentEventKind, EventDisposition, EventTarget, Key, KeyPressEvent,
    KeyboardModifiers, LabelTarget, PointerTarget, UiEvent, UiEventKind,
};
pub use crate::platform::Environment;
pub use crate::strategy::StrategyKind;
pub use crate::ui::{
    DropdownCoordinator, DropdownSettings, FocusHost, FocusTarget, SelectUi, VerticalAlignment,
};
