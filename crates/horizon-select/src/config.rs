//! Per-instance configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```
//! use horizon_select::SelectConfig;
//!
//! let config = SelectConfig::from_toml_str(r#"
//! typeahead_timeout_ms = 750
//! dropdown_class_name = "compact"
//! "#).unwrap();
//!
//! assert_eq!(config.typeahead_timeout_ms, 750);
//! assert_eq!(config.page_size, 10);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for the blur debounce and typeahead timeout, in milliseconds.
pub const MAX_DELAY_MS: u64 = 60_000;

/// Configuration of one select instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Delay between a blur and the resulting unfocus/close, in milliseconds.
    ///
    /// One frame at 30 Hz by default.
    pub blur_debounce_ms: f64,
    /// Idle time after which the typeahead buffer is cleared, in milliseconds.
    pub typeahead_timeout_ms: u64,
    /// Step used by PageUp/PageDown while the dropdown is open.
    pub page_size: usize,
    /// Minimum space below the control before the dropdown opens upwards.
    pub min_bottom_space: f32,
    /// Class name forwarded to the dropdown panel.
    pub dropdown_class_name: String,
    /// Apply ready attributes to the root directly instead of only announcing them.
    pub standalone: bool,
    /// Allow the managed ARIA combobox strategy.
    pub managed_aria: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            blur_debounce_ms: 1000.0 / 30.0,
            typeahead_timeout_ms: 500,
            page_size: 10,
            min_bottom_space: 160.0,
            dropdown_class_name: String::new(),
            standalone: false,
            managed_aria: true,
        }
    }
}

impl SelectConfig {
    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check every field is within its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.blur_debounce_ms.is_finite() || self.blur_debounce_ms <= 0.0 {
            return Err(ConfigError::invalid(
                "blur_debounce_ms",
                format!("must be a positive number of milliseconds, got {}", self.blur_debounce_ms),
            ));
        }
        if self.blur_debounce_ms > MAX_DELAY_MS as f64 {
            return Err(ConfigError::invalid(
                "blur_debounce_ms",
                format!("must not exceed {MAX_DELAY_MS} ms, got {}", self.blur_debounce_ms),
            ));
        }
        if self.typeahead_timeout_ms == 0 {
            return Err(ConfigError::invalid("typeahead_timeout_ms", "must be greater than zero"));
        }
        if self.typeahead_timeout_ms > MAX_DELAY_MS {
            return Err(ConfigError::invalid(
                "typeahead_timeout_ms",
                format!("must not exceed {MAX_DELAY_MS} ms, got {}", self.typeahead_timeout_ms),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be greater than zero"));
        }
        if !self.min_bottom_space.is_finite() || self.min_bottom_space < 0.0 {
            return Err(ConfigError::invalid(
                "min_bottom_space",
                format!("must be a non-negative number, got {}", self.min_bottom_space),
            ));
        }
        Ok(())
    }

    /// The blur debounce window, clamped to `0..=MAX_DELAY_MS`.
    pub fn blur_debounce(&self) -> Duration {
        let ms = if self.blur_debounce_ms.is_nan() {
            0.0
        } else {
            self.blur_debounce_ms.clamp(0.0, MAX_DELAY_MS as f64)
        };
        Duration::from_secs_f64(ms / 1000.0)
    }

    /// The typeahead idle timeout, clamped to `MAX_DELAY_MS`.
    pub fn typeahead_timeout(&self) -> Duration {
        Duration::from_millis(self.typeahead_timeout_ms.min(MAX_DELAY_MS))
    }
}
