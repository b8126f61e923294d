//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from every
//! bucket. Lazy read-side expiry keeps correctness on its own; the sweep
//! only reclaims memory sooner for entries nobody asks for again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStorage;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for the given interval between runs and locks one
/// bucket at a time, so a sweep never stalls unrelated buckets.
///
/// # Arguments
/// * `storage` - Shared bucket storage
/// * `interval` - Time between sweep runs
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it during shutdown.
pub fn spawn_sweep_task(storage: Arc<CacheStorage>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = storage.sweep_expired().await;
            if removed > 0 {
                info!(removed, "expiry sweep removed entries");
            } else {
                debug!("expiry sweep found nothing expired");
            }
        }
    })
}
