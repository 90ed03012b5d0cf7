//! TTL Cleanup Task
//!
//! Background sweep that drops cache keys whose TTL has elapsed, so expired
//! timelines and metadata stop occupying capacity even if nobody reads them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that periodically cleans up expired cache keys.
///
/// # Arguments
/// * `cache` - Shared cache handle
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: SharedCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));
    let store = cache.store();

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut guard = store.write().await;
                (guard.cleanup_expired(), guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "TTL cleanup: removed expired keys");
            } else {
                debug!(remaining, "TTL cleanup: no expired keys found");
            }
        }
    })
}
