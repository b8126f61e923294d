//! NetworkFirst Strategy
//!
//! Prefers a live network response inside a bounded wait, falling back to
//! the freshest non-expired cached entry on failure or timeout. The wait is
//! cancellable for the decision only: the in-flight fetch keeps running,
//! and a late success is stored for future use without ever changing the
//! response already returned.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::{BucketHandle, CacheStorage};
use crate::error::{CacheError, Result};
use crate::fetch::Fetcher;
use crate::models::{Request, StoredResponse};
use crate::policy::CacheRule;

/// Bounded wait applied when a NetworkFirst rule carries no explicit timeout.
const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(10);

// == Execute ==
/// Runs the NetworkFirst strategy for a classified request.
///
/// 1. Start the fetch with a bounded wait of the rule's network timeout.
/// 2. A timely successful response is stored (capacity eviction applies)
///    and returned; a timely non-2xx response is returned unstored.
/// 3. A transport failure or an elapsed timeout falls back to the freshest
///    non-expired cached entry for the key.
/// 4. With neither a timely response nor a usable entry, the network error
///    propagates to the caller.
pub async fn network_first(
    rule: &CacheRule,
    storage: &Arc<CacheStorage>,
    fetcher: &Arc<dyn Fetcher>,
    request: &Request,
) -> Result<StoredResponse> {
    let bucket = storage.open(&rule.cache_name, rule.limits()).await;
    let key = request.cache_key();
    let wait = rule.network_timeout.unwrap_or(DEFAULT_NETWORK_TIMEOUT);

    // The fetch runs as its own task so an elapsed wait abandons the
    // decision without cancelling the attempt itself.
    let fetch_fetcher = fetcher.clone();
    let fetch_request = request.clone();
    let mut in_flight: JoinHandle<Result<StoredResponse>> =
        tokio::spawn(async move { fetch_fetcher.fetch(&fetch_request).await });

    match timeout(wait, &mut in_flight).await {
        Ok(join_result) => match join_result {
            Ok(Ok(response)) => {
                if response.is_success() {
                    bucket.write().await.insert(key, response.clone());
                }
                Ok(response)
            }
            Ok(Err(fetch_err)) => {
                warn!(bucket = %rule.cache_name, %key, error = %fetch_err,
                      "network-first fetch failed, trying cache");
                fallback(&bucket, &key).await.ok_or(fetch_err)
            }
            Err(join_err) => {
                warn!(bucket = %rule.cache_name, %key, error = %join_err,
                      "network-first fetch task failed, trying cache");
                fallback(&bucket, &key)
                    .await
                    .ok_or_else(|| CacheError::Internal(join_err.to_string()))
            }
        },
        Err(_elapsed) => {
            debug!(bucket = %rule.cache_name, %key, timeout_ms = wait.as_millis() as u64,
                   "network-first wait elapsed, trying cache");
            spawn_late_writer(in_flight, bucket.clone(), key.clone());
            fallback(&bucket, &key).await.ok_or(CacheError::Timeout {
                url: request.url.clone(),
                timeout_ms: wait.as_millis() as u64,
            })
        }
    }
}

// == Fallback ==
/// Freshest non-expired cached entry for the key, if any.
async fn fallback(bucket: &BucketHandle, key: &str) -> Option<StoredResponse> {
    bucket.write().await.get(key)
}

// == Late Writer ==
/// Awaits an abandoned fetch and stores a late success under the normal
/// insert path, so eviction still applies and the bucket stays consistent.
fn spawn_late_writer(in_flight: JoinHandle<Result<StoredResponse>>, bucket: BucketHandle, key: String) {
    tokio::spawn(async move {
        if let Ok(Ok(response)) = in_flight.await {
            if response.is_success() {
                debug!(%key, "storing late network-first response");
                bucket.write().await.insert(key, response);
            }
        }
    });
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Destination;
    use crate::policy::{RequestMatcher, Strategy};
    use crate::strategy::testing::{FakeFetcher, FakeOutcome};

    fn rule(timeout: Duration) -> CacheRule {
        CacheRule {
            matcher: RequestMatcher::HostPattern("api.example.com".to_string()),
            strategy: Strategy::NetworkFirst,
            cache_name: "api".to_string(),
            max_entries: 20,
            max_age: Duration::from_secs(86_400),
            network_timeout: Some(timeout),
        }
    }

    fn api_request() -> Request {
        Request::get("https://api.example.com/v1/courses", Destination::Other)
    }

    #[tokio::test]
    async fn test_timely_response_returned_and_stored() {
        let storage = Arc::new(CacheStorage::new());
        let fetcher: Arc<dyn Fetcher> =
            Arc::new(FakeFetcher::always(StoredResponse::ok(b"live".to_vec())));
        let rule = rule(Duration::from_millis(500));
        let req = api_request();

        let resp = network_first(&rule, &storage, &fetcher, &req).await.unwrap();
        assert_eq!(resp.body, b"live");

        let bucket = storage.get("api").await.unwrap();
        assert_eq!(bucket.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_cache() {
        let storage = Arc::new(CacheStorage::new());
        let fake = Arc::new(FakeFetcher::failing());
        fake.push(FakeOutcome::Respond(StoredResponse::ok(b"old".to_vec())));
        let fetcher: Arc<dyn Fetcher> = fake.clone();
        let rule = rule(Duration::from_millis(500));
        let req = api_request();

        // First call populates the bucket, second hits the scripted failure.
        network_first(&rule, &storage, &fetcher, &req).await.unwrap();
        let resp = network_first(&rule, &storage, &fetcher, &req).await.unwrap();
        assert_eq!(resp.body, b"old");
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_cache() {
        let storage = Arc::new(CacheStorage::new());
        let fake = Arc::new(
            FakeFetcher::always(StoredResponse::ok(b"slow".to_vec()))
                .with_delay(Duration::from_millis(200)),
        );
        fake.push(FakeOutcome::Respond(StoredResponse::ok(b"old".to_vec())));

        // Seed the cache with a timely first response.
        let seed_rule = rule(Duration::from_millis(500));
        let fetcher: Arc<dyn Fetcher> = fake.clone();
        let req = api_request();
        network_first(&seed_rule, &storage, &fetcher, &req)
            .await
            .unwrap();

        // Now the 50ms wait elapses before the 200ms fetch completes.
        let tight_rule = rule(Duration::from_millis(50));
        let resp = network_first(&tight_rule, &storage, &fetcher, &req)
            .await
            .unwrap();
        assert_eq!(resp.body, b"old", "fallback must serve the cached entry");
    }

    #[tokio::test]
    async fn test_timeout_with_empty_cache_fails_visibly() {
        let storage = Arc::new(CacheStorage::new());
        let fetcher: Arc<dyn Fetcher> = Arc::new(
            FakeFetcher::always(StoredResponse::ok(b"slow".to_vec()))
                .with_delay(Duration::from_millis(200)),
        );
        let rule = rule(Duration::from_millis(50));

        let result = network_first(&rule, &storage, &fetcher, &api_request()).await;
        assert!(matches!(result, Err(CacheError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_failure_with_empty_cache_propagates() {
        let storage = Arc::new(CacheStorage::new());
        let fetcher: Arc<dyn Fetcher> = Arc::new(FakeFetcher::failing());
        let rule = rule(Duration::from_millis(500));

        let result = network_first(&rule, &storage, &fetcher, &api_request()).await;
        assert!(matches!(result, Err(CacheError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_late_success_is_stored_for_future_use() {
        let storage = Arc::new(CacheStorage::new());
        let fetcher: Arc<dyn Fetcher> = Arc::new(
            FakeFetcher::always(StoredResponse::ok(b"late".to_vec()))
                .with_delay(Duration::from_millis(100)),
        );
        let rule = rule(Duration::from_millis(30));
        let req = api_request();

        // Times out with nothing cached: visible failure.
        let result = network_first(&rule, &storage, &fetcher, &req).await;
        assert!(matches!(result, Err(CacheError::Timeout { .. })));

        // The abandoned fetch completes and is stored in the background.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let bucket = storage.get("api").await.unwrap();
        let cached = bucket.write().await.get(&req.cache_key()).unwrap();
        assert_eq!(cached.body, b"late");
    }

    #[tokio::test]
    async fn test_expired_entry_is_no_fallback() {
        let storage = Arc::new(CacheStorage::new());
        let fake = Arc::new(FakeFetcher::failing());
        fake.push(FakeOutcome::Respond(StoredResponse::ok(b"old".to_vec())));
        let fetcher: Arc<dyn Fetcher> = fake.clone();

        // Tiny max_age so the seeded entry expires before the second call.
        let mut short_rule = rule(Duration::from_millis(500));
        short_rule.max_age = Duration::from_millis(50);
        let req = api_request();

        network_first(&short_rule, &storage, &fetcher, &req)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let result = network_first(&short_rule, &storage, &fetcher, &req).await;
        assert!(
            matches!(result, Err(CacheError::Fetch { .. })),
            "expired entries must never be served as fallback"
        );
    }
}
