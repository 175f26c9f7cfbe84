//! Core primitives for Horizon Select.
//!
//! This crate provides the foundation the select engine is built on:
//!
//! - **Signal/Slot System**: Type-safe synchronous change notification
//! - **Property System**: Values with change detection
//! - **Timers**: Deterministic one-shot timers driven by caller-supplied time
//! - **Logging**: `tracing` targets and span names shared by all crates
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use horizon_select_core::TimerManager;
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut timers = TimerManager::new();
//! timers.start_one_shot(start, Duration::from_millis(500), "typeahead reset").unwrap();
//!
//! assert!(timers.process_expired(start).is_empty());
//! let fired = timers.process_expired(start + Duration::from_millis(500));
//! assert_eq!(fired.len(), 1);
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod signal;
mod timer;

pub use error::{CoreError, Result, TimerError};
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{TimerId, TimerManager};
