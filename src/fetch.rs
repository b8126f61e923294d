//! Network fetch seam
//!
//! The `Fetcher` trait is the one place the cache touches the network, so
//! strategies and the install lifecycle can be exercised against scripted
//! fetchers in tests. `HttpFetcher` is the real implementation.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{CacheError, Result};
use crate::models::{Method, Request, StoredResponse};

/// HTTP request timeout in seconds for the underlying client.
///
/// This is an outer transport bound; the per-rule NetworkFirst timeout is
/// enforced separately and is usually much shorter.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// == Fetcher Trait ==
/// Performs a live network fetch for an intercepted request.
///
/// Transport failures are `Err`; any HTTP response, including non-2xx,
/// is `Ok` — whether to store it is the caller's decision.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<StoredResponse>;
}

// == HTTP Fetcher ==
/// Real network fetcher.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a pooled client and transport timeout.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CacheError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<StoredResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let response = self
            .client
            .request(method, &request.url)
            .send()
            .await
            .map_err(|e| CacheError::Fetch {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::Fetch {
                url: request.url.clone(),
                reason: e.to_string(),
            })?
            .to_vec();

        Ok(StoredResponse {
            status,
            headers,
            body,
        })
    }
}
