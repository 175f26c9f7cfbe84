//! Observation adapter between the source list and the engine.
//!
//! Signals fire synchronously inside the writer's call stack. The observer
//! only queues what it sees; the composition root drains the queue once per
//! turn, so any number of mutations results in at most one reconciliation
//! pass and event order is preserved.

use std::collections::VecDeque;
use std::sync::Arc;

use horizon_select_core::ConnectionGuard;
use parking_lot::Mutex;

use super::list::SourceList;
use super::mutation::{MutationFilter, MutationRecord};

/// An observed event, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// A mutation record.
    Mutated(MutationRecord),
    /// A change notification.
    Changed,
}

/// Queues source list events until drained.
///
/// Dropping the observer disconnects it.
pub struct ListObserver {
    queue: Arc<Mutex<VecDeque<ListEvent>>>,
    _mutated: ConnectionGuard<MutationRecord>,
    _changed: ConnectionGuard<()>,
}

impl ListObserver {
    /// Start observing `list`.
    pub fn observe(list: &SourceList) -> Self {
        let queue = Arc::new(Mutex::new(VecDeque::new()));

        let sink = queue.clone();
        let mutated = list.mutated().connect_scoped(move |record: &MutationRecord| {
            sink.lock().push_back(ListEvent::Mutated(record.clone()));
        });
        let sink = queue.clone();
        let changed = list.changed().connect_scoped(move |_: &()| {
            sink.lock().push_back(ListEvent::Changed);
        });

        Self {
            queue,
            _mutated: mutated,
            _changed: changed,
        }
    }

    /// Take every queued event.
    pub fn drain(&self) -> ObservedBatch {
        ObservedBatch {
            events: self.queue.lock().drain(..).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Drop queued events without handling them.
    pub fn discard(&self) {
        self.queue.lock().clear();
    }
}

/// The events observed during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedBatch {
    pub events: Vec<ListEvent>,
}

impl ObservedBatch {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The mutation records, in order.
    pub fn records(&self) -> impl Iterator<Item = &MutationRecord> {
        self.events.iter().filter_map(|event| match event {
            ListEvent::Mutated(record) => Some(record),
            ListEvent::Changed => None,
        })
    }

    /// Number of change notifications.
    pub fn change_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ListEvent::Changed))
            .count()
    }

    /// Whether any record passes `filter`.
    pub fn matches(&self, filter: &MutationFilter) -> bool {
        filter.matches_any(self.records())
    }
}
