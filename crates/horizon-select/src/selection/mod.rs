//! Selection engine.
//!
//! - [`DragSelection`]: multi-select drag selection over option indices
//! - [`Navigation`]: keyboard stepping over enabled options
//! - [`Typeahead`] and [`search`]: incremental search by typing
//! - [`ScrollTracker`]: which option to scroll into view after a change
//!
//! Everything here is pure state over [`OptionInfo`](crate::source::OptionInfo)
//! slices. Callers apply the resulting writes to the source list.

mod drag;
mod navigation;
mod scroll;
mod transliterate;
mod typeahead;

pub use drag::{DragSelection, SelectionUpdate};
pub use navigation::Navigation;
pub use scroll::ScrollTracker;
pub use transliterate::transliterate;
pub use typeahead::{Typeahead, search};
