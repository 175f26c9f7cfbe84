//! Reactive properties with change detection.
//!
//! A [`Property<T>`] wraps a value and reports whether a write actually
//! changed it, so the owner can emit its notification signal only on real
//! changes.
//!
//! ```
//! use horizon_select_core::{Property, Signal};
//!
//! struct Label {
//!     text: Property<String>,
//!     text_changed: Signal<String>,
//! }
//!
//! impl Label {
//!     fn set_text(&self, text: &str) {
//!         if self.text.set(text.to_string()) {
//!             self.text_changed.emit(text.to_string());
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}
