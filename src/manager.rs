//! Cache Manager Module
//!
//! The single request-interception point. Each outgoing request is
//! classified against the ordered rules and answered by the matching
//! strategy; unmatched requests pass straight through to the network with
//! no caching side effects. Requests are handled independently, so calls
//! may run concurrently with no ordering guarantee between them.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheStats, CacheStorage};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::models::{Request, StoredResponse};
use crate::policy::{classify, CacheRule, Strategy};
use crate::strategy::{cache_first, network_first};

// == Offline Cache Manager ==
/// Dispatches intercepted requests to their governing cache strategy.
pub struct OfflineCacheManager {
    /// Ordered rules; first match wins
    rules: Vec<CacheRule>,
    /// Bucketed entry storage
    storage: Arc<CacheStorage>,
    /// The network seam
    fetcher: Arc<dyn Fetcher>,
}

impl OfflineCacheManager {
    // == Constructors ==
    /// Creates a manager over the given rules and fetcher.
    pub fn new(rules: Vec<CacheRule>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            rules,
            storage: Arc::new(CacheStorage::new()),
            fetcher,
        }
    }

    /// Creates a manager from a static configuration.
    pub fn from_config(config: &CacheConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::new(config.resolve_rules(), fetcher)
    }

    /// Shared handle to the entry storage, for the sweep task and the
    /// install lifecycle.
    pub fn storage(&self) -> Arc<CacheStorage> {
        self.storage.clone()
    }

    // == Handle ==
    /// Answers one intercepted request.
    pub async fn handle(&self, request: &Request) -> Result<StoredResponse> {
        match classify(&self.rules, request) {
            Some(rule) => match rule.strategy {
                Strategy::CacheFirst => {
                    cache_first(rule, &self.storage, &self.fetcher, request).await
                }
                Strategy::NetworkFirst => {
                    network_first(rule, &self.storage, &self.fetcher, request).await
                }
            },
            None => {
                debug!(url = %request.url, "unmatched request, passing through");
                self.fetcher.fetch(request).await
            }
        }
    }

    // == Stats ==
    /// Per-bucket counter snapshots.
    pub async fn stats(&self) -> HashMap<String, CacheStats> {
        self.storage.stats().await
    }
}
