//! Error types for the select engine.
//!
//! Only configuration and programming errors surface as [`SelectError`].
//! Transient races during event handling are logged and absorbed by the
//! broker and never reach the caller.

use thiserror::Error;

use crate::source::NodeKey;

/// The main error type for select operations.
#[derive(Error, Debug)]
pub enum SelectError {
    /// No registered behavior strategy accepted the list.
    ///
    /// This indicates a registry without a catch-all entry.
    #[error("no compatible behavior strategy (disabled: {disabled}, multiple: {multiple})")]
    NoCompatibleStrategy {
        /// The list's disabled flag at selection time.
        disabled: bool,
        /// The list's multiple flag at selection time.
        multiple: bool,
    },

    /// The strategy registry has no unconditional fallback entry.
    #[error("strategy registry has no catch-all strategy")]
    MissingCatchAll,

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A source list write addressed a node that no longer exists.
    #[error("unknown source list node: {0:?}")]
    UnknownNode(NodeKey),

    /// A structural write would produce an invalid tree (for example a group
    /// nested inside a group).
    #[error("invalid source list structure: {0}")]
    InvalidStructure(&'static str),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read select configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML document could not be parsed.
    #[error("failed to parse select configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value outside its valid range.
    #[error("invalid value for '{field}': {message}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid-value error.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Result type for select operations.
pub type Result<T> = std::result::Result<T, SelectError>;
