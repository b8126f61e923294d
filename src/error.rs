//! Error types for the offline cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the offline cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Network fetch failed at the transport level
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Network fetch did not complete within the bounded wait
    #[error("Fetch timed out after {timeout_ms}ms for {url}")]
    Timeout { url: String, timeout_ms: u64 },

    /// Precache installation was discarded partway through
    #[error("Installation aborted: {0}")]
    InstallAborted(String),

    /// Request could not be classified or keyed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// True if this error came from the network path (transport failure or
    /// timeout) rather than from the cache itself.
    pub fn is_network(&self) -> bool {
        matches!(self, CacheError::Fetch { .. } | CacheError::Timeout { .. })
    }
}

// == Result Type Alias ==
/// Convenience Result type for the offline cache.
pub type Result<T> = std::result::Result<T, CacheError>;
