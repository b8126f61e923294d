//! Bucket Module
//!
//! A named, independently-evicted collection of cache entries. Each bucket
//! carries its own capacity and age bounds, so eviction and expiry in one
//! bucket never involve any other.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, FifoTracker};
use crate::models::StoredResponse;

// == Bucket Limits ==
/// Capacity and age bounds for a bucket.
///
/// `None` means unbounded; precache buckets use that, since install-time
/// entries are replaced wholesale on update rather than evicted or expired.
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketLimits {
    /// Upper bound on entry count; oldest entries are evicted first
    pub max_entries: Option<usize>,
    /// Entries older than this are never served and removed lazily
    pub max_age: Option<Duration>,
}

impl BucketLimits {
    pub fn new(max_entries: usize, max_age: Duration) -> Self {
        Self {
            max_entries: Some(max_entries),
            max_age: Some(max_age),
        }
    }

    /// Unbounded bucket, neither capacity-evicted nor age-expired.
    pub fn unbounded() -> Self {
        Self::default()
    }
}

// == Bucket ==
/// Entry storage for one `cacheName`, combining a key map with FIFO order
/// tracking and per-bucket statistics.
#[derive(Debug)]
pub struct Bucket {
    /// Bucket name
    name: String,
    /// Key-entry storage
    entries: HashMap<String, CacheEntry>,
    /// Write-order tracker for oldest-first eviction
    order: FifoTracker,
    /// Operation counters
    stats: CacheStats,
    /// Capacity and age bounds
    limits: BucketLimits,
}

impl Bucket {
    // == Constructor ==
    /// Creates an empty bucket with the given bounds.
    pub fn new(name: impl Into<String>, limits: BucketLimits) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            order: FifoTracker::new(),
            stats: CacheStats::new(),
            limits,
        }
    }

    /// Bucket name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Looks up a non-expired entry for `key`.
    ///
    /// An expired entry is removed on the spot and counted as a miss; it is
    /// never served even if still physically present.
    pub fn get(&mut self, key: &str) -> Option<StoredResponse> {
        match self.entries.get(key) {
            Some(entry) => {
                if let Some(max_age) = self.limits.max_age {
                    if entry.is_expired(max_age) {
                        debug!(bucket = %self.name, key, "expired entry dropped on read");
                        self.entries.remove(key);
                        self.order.remove(key);
                        self.stats.record_expiration();
                        self.stats.record_miss();
                        self.stats.set_entries(self.entries.len());
                        return None;
                    }
                }
                self.stats.record_hit();
                Some(entry.response.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Writes a response under `key`, evicting oldest entries as needed to
    /// keep the bucket within its capacity bound.
    ///
    /// Overwriting an existing key refreshes its `stored_at` and makes it
    /// the newest entry for eviction purposes.
    pub fn insert(&mut self, key: impl Into<String>, response: StoredResponse) {
        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        if let Some(max_entries) = self.limits.max_entries {
            // Free one slot for a genuinely new key before it lands.
            while !is_overwrite && self.entries.len() >= max_entries {
                match self.order.evict_oldest() {
                    Some(oldest) => {
                        debug!(bucket = %self.name, key = %oldest, "evicted oldest entry");
                        self.entries.remove(&oldest);
                        self.stats.record_eviction();
                    }
                    None => break,
                }
            }
        }

        let entry = CacheEntry::new(key.clone(), response, self.name.clone());
        self.entries.insert(key.clone(), entry);
        self.order.record(&key);
        self.stats.record_insertion();
        self.stats.set_entries(self.entries.len());
    }

    // == Sweep Expired ==
    /// Removes every entry past the age bound.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let max_age = match self.limits.max_age {
            Some(max_age) => max_age,
            None => return 0,
        };

        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(max_age))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            self.entries.remove(&key);
            self.order.remove(&key);
            self.stats.record_expiration();
        }
        self.stats.set_entries(self.entries.len());
        count
    }

    // == Accessors ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the bucket holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key of the oldest-written entry, if any.
    pub fn oldest_key(&self) -> Option<&String> {
        self.order.peek_oldest()
    }

    /// When the entry under `key` was stored, if present.
    pub fn stored_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.get(key).map(|e| e.stored_at)
    }

    /// Snapshot of this bucket's counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_entries(self.entries.len());
        stats
    }

    /// Rewinds an entry's `stored_at`, for exercising expiry in tests.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &str, by: Duration) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stored_at = entry.stored_at
                - chrono::Duration::from_std(by).expect("backdate duration out of range");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn image_bucket(max_entries: usize) -> Bucket {
        Bucket::new(
            "images",
            BucketLimits::new(max_entries, Duration::from_secs(2_592_000)),
        )
    }

    #[test]
    fn test_bucket_insert_and_get() {
        let mut bucket = image_bucket(50);
        bucket.insert("GET /a.png", StoredResponse::ok(b"a".to_vec()));

        let resp = bucket.get("GET /a.png").unwrap();
        assert_eq!(resp.body, b"a");
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_bucket_miss() {
        let mut bucket = image_bucket(50);
        assert!(bucket.get("GET /missing.png").is_none());
        assert_eq!(bucket.stats().misses, 1);
    }

    #[test]
    fn test_bucket_capacity_evicts_oldest() {
        let mut bucket = image_bucket(3);
        bucket.insert("k1", StoredResponse::ok(b"1".to_vec()));
        bucket.insert("k2", StoredResponse::ok(b"2".to_vec()));
        bucket.insert("k3", StoredResponse::ok(b"3".to_vec()));
        bucket.insert("k4", StoredResponse::ok(b"4".to_vec()));

        assert_eq!(bucket.len(), 3);
        assert!(bucket.get("k1").is_none());
        assert!(bucket.get("k2").is_some());
        assert_eq!(bucket.oldest_key(), Some(&"k2".to_string()));
        assert_eq!(bucket.stats().evictions, 1);
    }

    #[test]
    fn test_bucket_reads_do_not_reorder_eviction() {
        let mut bucket = image_bucket(3);
        bucket.insert("k1", StoredResponse::ok(b"1".to_vec()));
        bucket.insert("k2", StoredResponse::ok(b"2".to_vec()));
        bucket.insert("k3", StoredResponse::ok(b"3".to_vec()));

        // A hit on k1 must not protect it: eviction is FIFO, not LRU.
        assert!(bucket.get("k1").is_some());
        bucket.insert("k4", StoredResponse::ok(b"4".to_vec()));

        assert!(bucket.get("k1").is_none());
        assert!(bucket.get("k2").is_some());
    }

    #[test]
    fn test_bucket_overwrite_refreshes_order() {
        let mut bucket = image_bucket(2);
        bucket.insert("k1", StoredResponse::ok(b"old".to_vec()));
        bucket.insert("k2", StoredResponse::ok(b"2".to_vec()));
        bucket.insert("k1", StoredResponse::ok(b"new".to_vec()));

        // k1 was rewritten, so k2 is now the oldest.
        bucket.insert("k3", StoredResponse::ok(b"3".to_vec()));
        assert!(bucket.get("k2").is_none());
        assert_eq!(bucket.get("k1").unwrap().body, b"new");
    }

    #[test]
    fn test_bucket_expired_entry_is_a_miss() {
        let mut bucket = Bucket::new("api", BucketLimits::new(20, Duration::from_secs(60)));
        bucket.insert("k1", StoredResponse::ok(b"1".to_vec()));
        bucket.backdate("k1", Duration::from_secs(120));

        assert!(bucket.get("k1").is_none());
        assert_eq!(bucket.len(), 0, "expired entry removed lazily");
        assert_eq!(bucket.stats().expirations, 1);
        assert_eq!(bucket.stats().misses, 1);
    }

    #[test]
    fn test_bucket_sweep_expired() {
        let mut bucket = Bucket::new("api", BucketLimits::new(20, Duration::from_secs(60)));
        bucket.insert("old", StoredResponse::ok(b"1".to_vec()));
        bucket.insert("fresh", StoredResponse::ok(b"2".to_vec()));
        bucket.backdate("old", Duration::from_secs(120));

        let removed = bucket.sweep_expired();
        assert_eq!(removed, 1);
        assert_eq!(bucket.len(), 1);
        assert!(bucket.get("fresh").is_some());
    }

    #[test]
    fn test_unbounded_bucket_never_evicts() {
        let mut bucket = Bucket::new("precache-v1", BucketLimits::unbounded());
        for i in 0..200 {
            bucket.insert(format!("k{}", i), StoredResponse::ok(b"x".to_vec()));
        }
        assert_eq!(bucket.len(), 200);
        assert_eq!(bucket.stats().evictions, 0);
        assert_eq!(bucket.sweep_expired(), 0);
    }
}
