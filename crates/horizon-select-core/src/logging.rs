//! Logging facilities for Horizon Select.
//!
//! Horizon Select uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the embedding application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_select=debug")
//!     .init();
//! ```
//!
//! Every log line carries one of the [`targets`] below so a subsystem can be
//! filtered in isolation.

/// Span names used throughout Horizon Select for tracing.
pub mod span_names {
    /// Broker event routing span.
    pub const BROKER: &str = "horizon_select::broker";
    /// Mirror reconciliation span.
    pub const RECONCILE: &str = "horizon_select::reconcile";
    /// Strategy selection and swap span.
    pub const STRATEGY: &str = "horizon_select::strategy";
    /// Timer processing span.
    pub const TIMER: &str = "horizon_select::timer";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Timer system target.
    pub const TIMER: &str = "horizon_select_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";
    /// Strategy registry and lifecycle target.
    pub const STRATEGY: &str = "horizon_select::strategy";
    /// Broker target.
    pub const BROKER: &str = "horizon_select::broker";
    /// Mirror builder and reconciler target.
    pub const MIRROR: &str = "horizon_select::mirror";
    /// Selection helpers target (drag, typeahead, navigation).
    pub const SELECTION: &str = "horizon_select::selection";
    /// Source list and mutation adapter target.
    pub const SOURCE: &str = "horizon_select::source";
    /// Composition root target.
    pub const SELECT: &str = "horizon_select::select";
}
