//! Cache Module
//!
//! Bucketed response storage with FIFO capacity eviction and age expiry.

mod bucket;
mod entry;
mod fifo;
mod stats;
mod store;


// Re-export public types
pub use bucket::{Bucket, BucketLimits};
pub use entry::CacheEntry;
pub use fifo::FifoTracker;
pub use stats::CacheStats;
pub use store::{BucketHandle, CacheStorage};
