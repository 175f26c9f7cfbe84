//! Incremental search by typing.
//!
//! [`Typeahead`] accumulates lower-cased keystrokes; the owner clears it
//! after [`Typeahead::timeout`] of idle time. [`search`] finds the option the
//! buffer designates.

use std::time::Duration;

use super::transliterate::transliterate;
use crate::source::{NodeKey, OptionInfo};

/// The typeahead buffer.
#[derive(Debug, Clone)]
pub struct Typeahead {
    buffer: String,
    timeout: Duration,
}

impl Typeahead {
    pub fn new(timeout: Duration) -> Self {
        Self {
            buffer: String::new(),
            timeout,
        }
    }

    /// Append the lower-cased `ch` and return the whole buffer.
    pub fn push(&mut self, ch: char) -> &str {
        self.buffer.extend(ch.to_lowercase());
        &self.buffer
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Idle time after which the buffer should be cleared.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Find the first enabled option whose text starts with `typed`, ignoring
/// case.
///
/// When nothing matches, or only the `current` option does, and `fold` is
/// set, the search is repeated with diacritics folded on both sides.
pub fn search<'a>(
    options: &'a [OptionInfo],
    typed: &str,
    current: Option<NodeKey>,
    fold: bool,
) -> Option<&'a OptionInfo> {
    let enabled = || options.iter().filter(|option| option.enabled);

    let found = enabled().find(|option| option.text.to_lowercase().starts_with(typed));
    if !fold || found.is_some_and(|option| Some(option.key) != current) {
        return found;
    }

    let typed = transliterate(typed);
    enabled()
        .find(|option| {
            transliterate(&option.text)
                .to_lowercase()
                .starts_with(&typed)
        })
        .or(found)
}
