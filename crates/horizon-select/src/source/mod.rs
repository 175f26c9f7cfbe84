//! The source list: options and groups owned by external code.
//!
//! - [`SourceList`]: shared handle with reads, writes and change signals
//! - [`MutationRecord`] / [`MutationFilter`]: what changed and who cares
//! - [`ListObserver`]: queues observed events for once-per-turn handling
//! - [`SnapshotNode`]: immutable tree snapshots consumed by the reconciler

mod list;
mod mutation;
mod node;
mod observer;
mod snapshot;

pub use list::{Capabilities, SourceList};
pub use mutation::{AttributeName, MutationFilter, MutationKind, MutationRecord, MutationTarget};
pub use node::{GroupSpec, NodeKey, NodeSpec, OptionInfo, OptionSpec};
pub use observer::{ListEvent, ListObserver, ObservedBatch};
pub use snapshot::{SnapshotKind, SnapshotNode, flatten_options};
