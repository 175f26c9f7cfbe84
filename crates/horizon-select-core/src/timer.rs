//! Deterministic one-shot timers.
//!
//! The select engine never reads the wall clock. Every operation that needs
//! time takes `now: Instant` from the caller, and timers fire only when the
//! caller drives [`TimerManager::process_expired`]. Each timer carries a
//! payload `T` which is handed back when it fires, so callers can route the
//! expiry without keeping a side table.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

#[derive(Debug)]
struct TimerData<T> {
    fire_time: Instant,
    payload: T,
}

/// An entry in the timer queue (min-heap by fire time, FIFO on ties).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Manages pending one-shot timers.
pub struct TimerManager<T> {
    timers: SlotMap<TimerId, TimerData<T>>,
    queue: BinaryHeap<TimerQueueEntry>,
    next_sequence: u64,
}

impl<T> TimerManager<T> {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Start a one-shot timer that fires `duration` after `now`.
    ///
    /// Fails with [`TimerError::DeadlineOverflow`] if the fire time cannot be
    /// represented.
    pub fn start_one_shot(
        &mut self,
        now: Instant,
        duration: Duration,
        payload: T,
    ) -> Result<TimerId> {
        let fire_time = now
            .checked_add(duration)
            .ok_or(TimerError::DeadlineOverflow)?;
        let id = self.timers.insert(TimerData { fire_time, payload });
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            fire_time,
            sequence,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?duration, "timer started");
        Ok(id)
    }

    /// Remove every pending timer whose payload matches `predicate`.
    ///
    /// Returns how many timers were removed.
    pub fn stop_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.timers.len();
        self.timers.retain(|_, timer| !predicate(&timer.payload));
        before - self.timers.len()
    }

    /// The earliest fire time among pending timers whose payload matches
    /// `predicate`.
    pub fn deadline_where<F>(&self, mut predicate: F) -> Option<Instant>
    where
        F: FnMut(&T) -> bool,
    {
        self.timers
            .values()
            .filter(|timer| predicate(&timer.payload))
            .map(|timer| timer.fire_time)
            .min()
    }

    /// Get the duration from `now` until the next timer fires, if any.
    ///
    /// Returns `None` if there are no pending timers.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale_heads();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Remove and return every timer due at or before `now`, in fire order.
    #[tracing::instrument(skip(self), target = "horizon_select_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.fire_time > now {
                break;
            }
            let Some(entry) = self.queue.pop() else {
                break;
            };

            // Stopped timers leave their queue entry behind.
            let Some(timer) = self.timers.remove(entry.id) else {
                continue;
            };

            tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
            fired.push((entry.id, timer.payload));
        }

        fired
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn discard_stale_heads(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<T> Default for TimerManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_in_order() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        timers.start_one_shot(start, ms(30), "late").unwrap();
        timers.start_one_shot(start, ms(10), "early").unwrap();

        assert!(timers.process_expired(start + ms(5)).is_empty());

        let fired: Vec<_> = timers
            .process_expired(start + ms(30))
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(fired, vec!["early", "late"]);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_ties_fire_fifo() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        for n in 0..4 {
            timers.start_one_shot(start, ms(10), n).unwrap();
        }
        let fired: Vec<_> = timers
            .process_expired(start + ms(10))
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(fired, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_deadline_overflow_is_an_error() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        let err = timers.start_one_shot(start, Duration::MAX, ()).unwrap_err();
        assert_eq!(err, CoreError::Timer(TimerError::DeadlineOverflow));
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_deadline_where() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        timers.start_one_shot(start, ms(30), 'a').unwrap();
        timers.start_one_shot(start, ms(10), 'b').unwrap();
        timers.start_one_shot(start, ms(20), 'a').unwrap();

        assert_eq!(timers.deadline_where(|p| *p == 'a'), Some(start + ms(20)));
        assert_eq!(timers.deadline_where(|p| *p == 'c'), None);
    }

    #[test]
    fn test_stop_where() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        timers.start_one_shot(start, ms(10), 1).unwrap();
        timers.start_one_shot(start, ms(10), 2).unwrap();
        timers.start_one_shot(start, ms(10), 3).unwrap();

        assert_eq!(timers.stop_where(|p| *p % 2 == 1), 2);
        let fired: Vec<_> = timers
            .process_expired(start + ms(10))
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(fired, vec![2]);
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        timers.start_one_shot(start, ms(10), 1).unwrap();
        timers.start_one_shot(start, ms(40), 2).unwrap();
        timers.stop_where(|p| *p == 1);

        assert_eq!(timers.time_until_next(start), Some(ms(40)));
        assert_eq!(timers.time_until_next(start + ms(50)), Some(Duration::ZERO));
    }
}
