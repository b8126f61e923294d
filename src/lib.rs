//! Offline response cache for an installable web application.
//!
//! Intercepted requests are classified against an ordered rule list and
//! answered by a caching strategy (CacheFirst or NetworkFirst with a
//! bounded wait), with per-bucket FIFO eviction and age expiry. A staged,
//! all-or-nothing install lifecycle manages the precached asset bundle.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod manager;
pub mod manifest;
pub mod models;
pub mod policy;
pub mod strategy;
pub mod tasks;

pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use install::{InstallState, Installer, PrecacheAsset, PrecacheManifest};
pub use manager::OfflineCacheManager;
pub use manifest::WebAppManifest;
pub use models::{Destination, Method, Request, StoredResponse};
pub use tasks::spawn_sweep_task;
