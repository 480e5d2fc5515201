//! ## callsim-core::queue
//! **Time-keyed delivery queue**
//!
//! Values are tagged with a "ready at" timestamp and released no earlier than
//! that time: in timestamp order, and in insertion order among values sharing a
//! timestamp. The queue never creates, drops or reorders values across
//! timestamps, so draining it yields every inserted value exactly once.

use std::collections::{BTreeMap, VecDeque};

/// Ordered mapping from readiness timestamp (ms) to the FIFO of values due then.
#[derive(Debug)]
pub struct DelayedQueue<T> {
    delayed: BTreeMap<u64, VecDeque<T>>,
    len: usize,
}

impl<T> Default for DelayedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DelayedQueue<T> {
    pub fn new() -> Self {
        Self {
            delayed: BTreeMap::new(),
            len: 0,
        }
    }

    /// Inserts `value` to become ready at `ready_at_ms`.
    pub fn add(&mut self, ready_at_ms: u64, value: T) {
        self.delayed.entry(ready_at_ms).or_default().push_back(value);
        self.len += 1;
    }

    /// Removes and returns the oldest value whose ready time is `<= now_ms`.
    ///
    /// Returns `None` if the queue is empty or the earliest ready time is still
    /// in the future.
    pub fn next_ready(&mut self, now_ms: u64) -> Option<T> {
        let mut entry = self.delayed.first_entry()?;
        if *entry.key() > now_ms {
            return None;
        }

        let bucket = entry.get_mut();
        let value = bucket.pop_front();
        if bucket.is_empty() {
            entry.remove();
        }

        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    /// Removes and returns the next value regardless of its ready time.
    #[inline]
    pub fn drain(&mut self) -> Option<T> {
        self.next_ready(u64::MAX)
    }

    /// Earliest pending ready time, if any.
    #[inline]
    pub fn next_ready_at(&self) -> Option<u64> {
        self.delayed.first_key_value().map(|(ready_at, _)| *ready_at)
    }

    /// Number of pending values (not distinct timestamps).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
