//! Cache Storage Module
//!
//! Holds all buckets behind per-bucket locks. The outer map lock is only
//! taken long enough to find or create a bucket handle; entry reads and
//! writes serialize per bucket, so eviction in one bucket never blocks
//! operations on another.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{Bucket, BucketLimits, CacheStats};

/// Shared handle to one bucket.
pub type BucketHandle = Arc<RwLock<Bucket>>;

// == Cache Storage ==
/// All buckets of the cache, keyed by `cacheName`.
#[derive(Debug, Default)]
pub struct CacheStorage {
    buckets: RwLock<HashMap<String, BucketHandle>>,
}

impl CacheStorage {
    // == Constructor ==
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    // == Open ==
    /// Returns the bucket named `name`, creating it with `limits` on first
    /// use. Limits are fixed at creation; later opens ignore them.
    pub async fn open(&self, name: &str, limits: BucketLimits) -> BucketHandle {
        {
            let buckets = self.buckets.read().await;
            if let Some(handle) = buckets.get(name) {
                return handle.clone();
            }
        }

        let mut buckets = self.buckets.write().await;
        buckets
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(Bucket::new(name, limits))))
            .clone()
    }

    // == Get ==
    /// Returns the bucket named `name` if it already exists.
    pub async fn get(&self, name: &str) -> Option<BucketHandle> {
        self.buckets.read().await.get(name).cloned()
    }

    // == Remove ==
    /// Drops a bucket and all of its entries. Returns true if it existed.
    pub async fn remove(&self, name: &str) -> bool {
        self.buckets.write().await.remove(name).is_some()
    }

    // == Purge ==
    /// Drops every bucket whose name starts with `prefix`, except the one
    /// named `keep`. Used at activation to discard stale precache versions.
    ///
    /// Returns the names of the buckets removed.
    pub async fn purge_prefix_except(&self, prefix: &str, keep: &str) -> Vec<String> {
        let mut buckets = self.buckets.write().await;
        let stale: Vec<String> = buckets
            .keys()
            .filter(|name| name.starts_with(prefix) && name.as_str() != keep)
            .cloned()
            .collect();

        for name in &stale {
            buckets.remove(name);
            info!(bucket = %name, "purged stale bucket");
        }
        stale
    }

    // == Names ==
    /// Names of all existing buckets.
    pub async fn names(&self) -> Vec<String> {
        self.buckets.read().await.keys().cloned().collect()
    }

    // == Sweep Expired ==
    /// Sweeps expired entries from every bucket, one bucket at a time.
    ///
    /// Returns the total number of entries removed.
    pub async fn sweep_expired(&self) -> usize {
        let handles: Vec<BucketHandle> = {
            let buckets = self.buckets.read().await;
            buckets.values().cloned().collect()
        };

        let mut removed = 0;
        for handle in handles {
            removed += handle.write().await.sweep_expired();
        }
        removed
    }

    // == Stats ==
    /// Per-bucket counter snapshots.
    pub async fn stats(&self) -> HashMap<String, CacheStats> {
        let handles: Vec<(String, BucketHandle)> = {
            let buckets = self.buckets.read().await;
            buckets
                .iter()
                .map(|(name, handle)| (name.clone(), handle.clone()))
                .collect()
        };

        let mut out = HashMap::new();
        for (name, handle) in handles {
            out.insert(name, handle.read().await.stats());
        }
        out
    }

    /// Counters summed across all buckets.
    pub async fn aggregate_stats(&self) -> CacheStats {
        let mut total = CacheStats::new();
        for stats in self.stats().await.values() {
            total.merge(stats);
        }
        total
    }
}
