//! Horizon Select - an accessible custom-rendered select engine.
//!
//! The crate keeps a custom dropdown in step with a live, externally mutable
//! option list while preserving keyboard, screen reader and pointer
//! accessibility across environments with very different native behavior.
//!
//! - [`source`]: the option list owned by external code, with change signals
//! - [`mirror`]: the UI-side tree and the reconciler keeping it in sync
//! - [`selection`]: drag selection, keyboard navigation and typeahead
//! - [`strategy`]: per-environment behavior strategies and their registry
//! - [`broker`]: owns the active strategy and its session
//! - [`Select`]: the composition root hosts feed events into
//!
//! Time is always supplied by the caller: timer-driven behavior (blur
//! debounce, typeahead reset, focus intents) advances through
//! [`Select::advance`].

pub mod accessibility;
pub mod broker;
pub mod button;
pub mod config;
mod error;
pub mod events;
pub mod mirror;
pub mod options_view;
pub mod platform;
pub mod prelude;
pub mod select;
pub mod selection;
pub mod source;
pub mod strategy;
pub mod ui;

pub use broker::Broker;
pub use button::ButtonState;
pub use config::SelectConfig;
pub use error::{ConfigError, Result, SelectError};
pub use options_view::OptionsView;
pub use platform::Environment;
pub use select::{ReadyEvent, Select, StyleRegistry};
pub use source::{NodeKey, SourceList};
pub use strategy::{StrategyKind, StrategyRegistry};

static_assertions::assert_impl_all!(SelectConfig: Send, Sync);
static_assertions::assert_impl_all!(SelectError: Send, Sync, std::error::Error);
