//! FIFO Tracker Module
//!
//! Tracks insertion order for oldest-first eviction. Unlike an LRU queue,
//! reads never reorder entries; only a (re)write moves a key to the back.

use std::collections::VecDeque;

// == FIFO Tracker ==
/// Tracks insertion order of keys in a bucket.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest write
/// - Back = Newest write
#[derive(Debug, Default)]
pub struct FifoTracker {
    /// Keys ordered by write time
    order: VecDeque<String>,
}

impl FifoTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records a write of `key`, moving it to the back (newest).
    ///
    /// An overwrite counts as a fresh write: the key's old position is
    /// discarded so its eviction order follows its new `stored_at`.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the oldest-written key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the oldest-written key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
