//! Precache Manifest Module
//!
//! The fixed set of static assets downloaded at install time, independent
//! of runtime requests. The manifest is generated from an asset listing:
//! only precacheable extension classes are included, and a hard ceiling on
//! cumulative payload size excludes assets that would push the total over.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Extension classes eligible for precaching: script, style, markup and
/// the common image formats.
const PRECACHE_EXTENSIONS: &[&str] = &[
    "js", "mjs", "css", "html", "htm", "ico", "png", "jpg", "jpeg", "gif", "svg", "webp",
];

// == Precache Asset ==
/// One static asset in the precache list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrecacheAsset {
    /// Asset URL; absolute, or a site-relative path starting with `/`
    pub url: String,
    /// Payload size in bytes
    pub bytes: u64,
}

impl PrecacheAsset {
    pub fn new(url: impl Into<String>, bytes: u64) -> Self {
        Self {
            url: url.into(),
            bytes,
        }
    }
}

// == Precache Manifest ==
/// Versioned list of assets to download and cache at install time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecacheManifest {
    /// Version identity derived from the asset list; a changed asset set
    /// is a new version, an identical set never triggers an update
    pub version: String,
    /// Assets to precache, in listing order
    pub assets: Vec<PrecacheAsset>,
}

impl PrecacheManifest {
    // == Build ==
    /// Builds a manifest from an asset listing.
    ///
    /// Assets with a non-precacheable extension are dropped; assets that
    /// would push the cumulative total past `ceiling_bytes` are excluded
    /// (later, smaller assets may still fit).
    pub fn build(
        assets: impl IntoIterator<Item = PrecacheAsset>,
        ceiling_bytes: u64,
    ) -> Self {
        let mut included = Vec::new();
        let mut total: u64 = 0;

        for asset in assets {
            if !is_precacheable(&asset.url) {
                continue;
            }
            if total + asset.bytes > ceiling_bytes {
                warn!(url = %asset.url, bytes = asset.bytes,
                      "asset excluded from precache, ceiling reached");
                continue;
            }
            total += asset.bytes;
            included.push(asset);
        }

        let version = version_of(&included);
        Self {
            version,
            assets: included,
        }
    }

    // == From Directory ==
    /// Builds a manifest by walking a static-asset directory. Asset URLs
    /// are site-relative paths rooted at `root`.
    pub fn from_dir(root: &Path, ceiling_bytes: u64) -> Result<Self> {
        let mut listing = Vec::new();
        collect_assets(root, root, &mut listing)?;
        // Deterministic listing order regardless of directory iteration.
        listing.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(Self::build(listing, ceiling_bytes))
    }

    /// Cumulative payload size of the included assets.
    pub fn total_bytes(&self) -> u64 {
        self.assets.iter().map(|a| a.bytes).sum()
    }

    /// Number of included assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True if nothing survived filtering.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// True if a URL's extension belongs to a precacheable class.
pub fn is_precacheable(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit_once('.') {
        Some((_, ext)) => PRECACHE_EXTENSIONS
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Version identity: hash of the included asset list.
fn version_of(assets: &[PrecacheAsset]) -> String {
    let mut hasher = DefaultHasher::new();
    for asset in assets {
        asset.hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

/// Recursive directory walk collecting file paths and sizes.
fn collect_assets(root: &Path, dir: &Path, out: &mut Vec<PrecacheAsset>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read asset directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_assets(root, &path, out)?;
        } else {
            let meta = entry
                .metadata()
                .with_context(|| format!("failed to stat {}", path.display()))?;
            let rel = path
                .strip_prefix(root)
                .expect("walked path is always under root");
            let url = format!("/{}", rel.to_string_lossy().replace('\\', "/"));
            out.push(PrecacheAsset::new(url, meta.len()));
        }
    }
    Ok(())
}
