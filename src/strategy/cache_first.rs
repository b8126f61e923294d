//! CacheFirst Strategy
//!
//! Prefers the cached response: a fresh entry is returned without touching
//! the network, and the network is consulted only on a miss or expiry.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::CacheStorage;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::models::{Request, StoredResponse};
use crate::policy::CacheRule;

// == Execute ==
/// Runs the CacheFirst strategy for a classified request.
///
/// 1. A non-expired cached entry is returned immediately.
/// 2. Otherwise the network is fetched; a successful response is stored
///    (capacity eviction applies) and returned.
/// 3. A non-2xx response is returned to the caller but never stored.
/// 4. A fetch failure with no cached entry propagates to the caller,
///    without retry.
pub async fn cache_first(
    rule: &CacheRule,
    storage: &Arc<CacheStorage>,
    fetcher: &Arc<dyn Fetcher>,
    request: &Request,
) -> Result<StoredResponse> {
    let bucket = storage.open(&rule.cache_name, rule.limits()).await;
    let key = request.cache_key();

    if let Some(cached) = bucket.write().await.get(&key) {
        debug!(bucket = %rule.cache_name, %key, "cache-first hit");
        return Ok(cached);
    }

    debug!(bucket = %rule.cache_name, %key, "cache-first miss, fetching");
    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.is_success() {
                bucket.write().await.insert(key, response.clone());
            }
            Ok(response)
        }
        Err(e) => {
            warn!(bucket = %rule.cache_name, %key, error = %e, "cache-first fetch failed");
            Err(e)
        }
    }
}
