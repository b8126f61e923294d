//! Cache Statistics Module
//!
//! Per-bucket counters for hits, misses, insertions, evictions and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Operation counters for a single bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads answered from the bucket
    pub hits: u64,
    /// Reads that found nothing usable
    pub misses: u64,
    /// Entries written
    pub insertions: u64,
    /// Entries removed to satisfy the capacity bound
    pub evictions: u64,
    /// Entries removed because their age exceeded the bound
    pub expirations: u64,
    /// Current entry count
    pub entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn set_entries(&mut self, entries: usize) {
        self.entries = entries;
    }

    /// Merges another bucket's counters into this one, for aggregate views.
    pub fn merge(&mut self, other: &CacheStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.insertions += other.insertions;
        self.evictions += other.evictions;
        self.expirations += other.expirations;
        self.entries += other.entries;
    }
}
