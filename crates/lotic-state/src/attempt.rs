//! Per-lot attempt numbering for partial and removed manifests.

use std::collections::{HashMap, VecDeque};

/// Assigns monotonically increasing attempt ordinals per lot.
///
/// The counter retains only the most recent `capacity` lots, evicting the
/// oldest-seen lot when a new one arrives past capacity. Ordinals are
/// monotonic per lot within the lifetime of the counter; a lot revisited
/// after eviction, or after a process restart, starts again at 1. Manifest
/// keys stay unique regardless because writes are checked for existence
/// before they land.
#[derive(Debug)]
pub struct AttemptCounter {
    capacity: usize,
    counts: HashMap<String, u32>,
    order: VecDeque<String>,
}

impl AttemptCounter {
    /// Default number of lots retained.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates a counter retaining the default number of lots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a counter retaining at most `capacity` lots.
    ///
    /// A zero capacity is treated as one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            counts: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Returns the next attempt ordinal for the lot, starting at 1.
    pub fn next_attempt(&mut self, lot_id: &str) -> u32 {
        if let Some(count) = self.counts.get_mut(lot_id) {
            *count += 1;
            return *count;
        }

        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.counts.remove(&oldest);
            }
        }

        self.order.push_back(lot_id.to_string());
        self.counts.insert(lot_id.to_string(), 1);
        1
    }

    /// Returns the last ordinal assigned for the lot, if it is still
    /// retained.
    #[must_use]
    pub fn current_attempt(&self, lot_id: &str) -> Option<u32> {
        self.counts.get(lot_id).copied()
    }
}

impl Default for AttemptCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_monotonic_per_lot() {
        let mut counter = AttemptCounter::new();

        assert_eq!(counter.next_attempt("20230206PT15M095"), 1);
        assert_eq!(counter.next_attempt("20230206PT15M095"), 2);
        assert_eq!(counter.next_attempt("20230206PT15M096"), 1);
        assert_eq!(counter.next_attempt("20230206PT15M095"), 3);

        assert_eq!(counter.current_attempt("20230206PT15M095"), Some(3));
        assert_eq!(counter.current_attempt("20230206PT15M096"), Some(1));
    }

    #[test]
    fn oldest_lot_is_evicted_past_capacity() {
        let mut counter = AttemptCounter::with_capacity(2);

        counter.next_attempt("a");
        counter.next_attempt("b");
        counter.next_attempt("c");

        assert_eq!(counter.current_attempt("a"), None);
        assert_eq!(counter.current_attempt("b"), Some(1));
        assert_eq!(counter.current_attempt("c"), Some(1));

        // an evicted lot restarts its numbering
        assert_eq!(counter.next_attempt("a"), 1);
    }

    #[test]
    fn revisiting_a_lot_does_not_refresh_its_age() {
        let mut counter = AttemptCounter::with_capacity(2);

        counter.next_attempt("a");
        counter.next_attempt("b");
        counter.next_attempt("a");
        counter.next_attempt("c");

        // "a" was oldest-inserted, so it goes first
        assert_eq!(counter.current_attempt("a"), None);
        assert_eq!(counter.current_attempt("b"), Some(1));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut counter = AttemptCounter::with_capacity(0);
        assert_eq!(counter.next_attempt("a"), 1);
        assert_eq!(counter.next_attempt("a"), 2);
    }
}
