//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with age-based expiry.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::StoredResponse;

// == Cache Entry ==
/// A single cached response plus the metadata needed to expire it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Normalized request identity this entry answers
    pub key: String,
    /// The replayable response payload
    pub response: StoredResponse,
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
    /// Logical bucket the entry belongs to
    pub cache_name: String,
}

impl CacheEntry {
    /// Creates a new entry stamped with the current time.
    pub fn new(key: String, response: StoredResponse, cache_name: String) -> Self {
        Self {
            key,
            response,
            stored_at: Utc::now(),
            cache_name,
        }
    }

    /// Age of the entry in milliseconds. Clock skew (a `stored_at` in the
    /// future) reads as zero rather than going negative.
    pub fn age_ms(&self) -> u64 {
        let ms = Utc::now()
            .signed_duration_since(self.stored_at)
            .num_milliseconds();
        ms.max(0) as u64
    }

    /// Checks whether the entry has outlived `max_age`.
    ///
    /// Boundary condition: an entry is expired once its age is greater than
    /// or equal to `max_age`, so an entry stored exactly `max_age` ago is
    /// already expired and must not be served.
    pub fn is_expired(&self, max_age: Duration) -> bool {
        self.age_ms() >= max_age.as_millis() as u64
    }
}
