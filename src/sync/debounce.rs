//! Trailing debounce keyed by an arbitrary value.
//!
//! Scheduling a key replaces any deadline it already had, so a burst of
//! triggers collapses into one run `delay` after the last trigger. Time is
//! passed in by the caller; the debouncer owns no timer.

use indexmap::IndexMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Pending deadlines per key.
#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    delay: Duration,
    pending: IndexMap<K, Instant>,
}

impl<K: Eq + Hash + Clone> Debouncer<K> {
    /// Creates a debouncer with the given window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: IndexMap::new(),
        }
    }

    /// Returns the debounce window.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Changes the window for triggers scheduled from now on.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedules `key` to run `delay` after `now`, replacing any earlier deadline.
    pub fn schedule(&mut self, key: K, now: Instant) {
        self.pending.insert(key, now + self.delay);
    }

    /// Removes and returns every key whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, &deadline)| deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &due {
            self.pending.shift_remove(key);
        }
        due
    }

    /// Returns the earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Returns true if `key` is waiting to run.
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Drops the pending run for `key`.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.shift_remove(key).is_some()
    }

    /// Drops every pending run.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}
