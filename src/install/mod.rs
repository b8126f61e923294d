//! Install Module
//!
//! Installation and update lifecycle of the precached asset bundle.
//!
//! The new version is always staged into its own bucket before anything is
//! activated: a failed precache discards the staging bucket wholesale and
//! the previously active version, if any, keeps serving untouched. There
//! is never a partially installed asset set.

mod precache;

pub use precache::{is_precacheable, PrecacheAsset, PrecacheManifest};

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use url::Url;

use crate::cache::{BucketLimits, CacheStorage};
use crate::error::{CacheError, Result};
use crate::fetch::Fetcher;
use crate::models::{Destination, Request, StoredResponse};

/// Bucket-name prefix shared by all precache versions.
const PRECACHE_PREFIX: &str = "precache-";

// == Install State ==
/// Lifecycle state of the installed application bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    /// No version has ever been installed
    Uninstalled,
    /// First install is precaching
    Installing,
    /// Precache complete, activation pending
    InstalledWaiting { version: String },
    /// This version answers precache lookups
    InstalledActive { version: String },
    /// A newer manifest is precaching while `active` keeps serving
    Updating { active: String },
}

// == Installer ==
/// Drives the install/update state machine over the shared bucket storage.
pub struct Installer {
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    /// Origin used to resolve site-relative asset paths
    origin: Option<Url>,
    state: RwLock<InstallState>,
}

impl Installer {
    // == Constructor ==
    pub fn new(storage: Arc<CacheStorage>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            storage,
            fetcher,
            origin: None,
            state: RwLock::new(InstallState::Uninstalled),
        }
    }

    /// Sets the origin that site-relative asset paths resolve against.
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> InstallState {
        self.state.read().await.clone()
    }

    /// Version currently answering precache lookups, if any.
    pub async fn active_version(&self) -> Option<String> {
        match &*self.state.read().await {
            InstallState::InstalledActive { version } => Some(version.clone()),
            InstallState::Updating { active } => Some(active.clone()),
            _ => None,
        }
    }

    // == Install ==
    /// First-visit installation: precaches the manifest and activates it.
    ///
    /// All-or-nothing: any asset fetch failure aborts the whole attempt and
    /// the state returns to `Uninstalled` with the staging bucket removed.
    pub async fn install(&self, manifest: &PrecacheManifest) -> Result<()> {
        {
            let mut state = self.state.write().await;
            let current = state.clone();
            if current != InstallState::Uninstalled {
                return Err(CacheError::Internal(format!(
                    "install requires an uninstalled application, state is {:?}",
                    current
                )));
            }
            *state = InstallState::Installing;
        }

        info!(version = %manifest.version, assets = manifest.len(), "installing");
        match self.stage(manifest).await {
            Ok(()) => {
                *self.state.write().await = InstallState::InstalledWaiting {
                    version: manifest.version.clone(),
                };
                self.activate(&manifest.version).await;
                Ok(())
            }
            Err(e) => {
                self.discard_staging(&manifest.version).await;
                *self.state.write().await = InstallState::Uninstalled;
                warn!(version = %manifest.version, error = %e, "install aborted");
                Err(CacheError::InstallAborted(e.to_string()))
            }
        }
    }

    // == Check For Update ==
    /// Compares a freshly fetched manifest against the active version and
    /// runs a staged update when it differs.
    ///
    /// Returns true if a new version was installed and activated. On a
    /// failed update the previously active version keeps serving and the
    /// error is `InstallAborted`.
    pub async fn check_for_update(&self, manifest: &PrecacheManifest) -> Result<bool> {
        let active = {
            let mut state = self.state.write().await;
            match state.clone() {
                InstallState::Uninstalled => None,
                InstallState::InstalledActive { version } if version == manifest.version => {
                    return Ok(false);
                }
                InstallState::InstalledActive { version } => {
                    *state = InstallState::Updating {
                        active: version.clone(),
                    };
                    Some(version)
                }
                other => {
                    return Err(CacheError::Internal(format!(
                        "install already in progress, state is {:?}",
                        other
                    )))
                }
            }
        };

        let active = match active {
            Some(active) => active,
            None => {
                self.install(manifest).await?;
                return Ok(true);
            }
        };

        info!(from = %active, to = %manifest.version, "updating");
        match self.stage(manifest).await {
            Ok(()) => {
                *self.state.write().await = InstallState::InstalledWaiting {
                    version: manifest.version.clone(),
                };
                self.activate(&manifest.version).await;
                Ok(true)
            }
            Err(e) => {
                self.discard_staging(&manifest.version).await;
                *self.state.write().await = InstallState::InstalledActive { version: active };
                warn!(version = %manifest.version, error = %e, "update aborted, previous version kept");
                Err(CacheError::InstallAborted(e.to_string()))
            }
        }
    }

    // == Serve ==
    /// Looks the request up in the active precache bucket.
    ///
    /// Precached entries are exempt from age expiry and capacity eviction;
    /// they disappear only when an update purges their version.
    pub async fn serve_precached(&self, request: &Request) -> Option<StoredResponse> {
        let version = self.active_version().await?;
        let bucket = self.storage.get(&bucket_name(&version)).await?;
        let resolved = self.resolve_url(&request.url).ok()?;
        let key = format!("{} {}", request.method.as_str(), resolved);
        let stored = bucket.write().await.get(&key);
        stored
    }

    // == Staging ==
    /// Fetches every manifest asset into the version's staging bucket.
    /// The first failure (transport error or non-2xx) stops the whole stage.
    async fn stage(&self, manifest: &PrecacheManifest) -> Result<()> {
        let bucket = self
            .storage
            .open(&bucket_name(&manifest.version), BucketLimits::unbounded())
            .await;

        for asset in &manifest.assets {
            let url = self.resolve_url(&asset.url)?;
            let request = Request::get(url.clone(), Destination::Other);
            let response = self.fetcher.fetch(&request).await?;
            if !response.is_success() {
                return Err(CacheError::Fetch {
                    url,
                    reason: format!("precache fetch returned status {}", response.status),
                });
            }
            bucket.write().await.insert(request.cache_key(), response);
        }
        Ok(())
    }

    async fn discard_staging(&self, version: &str) {
        self.storage.remove(&bucket_name(version)).await;
    }

    /// Activates a staged version: stale precache buckets are purged and
    /// the state moves to `InstalledActive`. Activation is automatic, with
    /// no user confirmation step.
    async fn activate(&self, version: &str) {
        self.storage
            .purge_prefix_except(PRECACHE_PREFIX, &bucket_name(version))
            .await;
        *self.state.write().await = InstallState::InstalledActive {
            version: version.to_string(),
        };
        info!(%version, "activated");
    }

    /// Absolute URL for an asset path: site-relative paths resolve against
    /// the configured origin.
    fn resolve_url(&self, url: &str) -> Result<String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        match &self.origin {
            Some(origin) => origin
                .join(url)
                .map(|u| u.to_string())
                .map_err(|e| CacheError::InvalidRequest(format!("{}: {}", url, e))),
            None => Err(CacheError::InvalidRequest(format!(
                "relative asset path {} with no origin configured",
                url
            ))),
        }
    }
}

/// Bucket name for a precache version.
fn bucket_name(version: &str) -> String {
    format!("{}{}", PRECACHE_PREFIX, version)
}
