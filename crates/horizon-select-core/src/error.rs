//! Error types for Horizon Select core primitives.

use thiserror::Error;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Timer-related error.
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),
}

/// Timer-specific errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The fire time lies beyond what `Instant` can represent.
    #[error("timer deadline out of range")]
    DeadlineOverflow,
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
