use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::provider::CatalogProvider;

/// Runs the blocking catalog load on a background task and resolves
/// to whether the catalog ended up loaded.
///
/// The returned handle is the caller's cancellation hook: aborting it
/// (or racing it against a timeout) abandons the attempt, though the
/// underlying fetch itself is not interruptible. The handle resolves
/// exactly once.
pub fn spawn_load(provider: Arc<CatalogProvider>) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || provider.load()).await;
        match result {
            Ok(Ok(stats)) => {
                info!(
                    "Catalog load finished: {} artists, {} albums, {} tracks",
                    stats.artists, stats.albums, stats.tracks
                );
                true
            }
            Ok(Err(err)) => {
                warn!("Catalog load failed: {}", err);
                false
            }
            Err(err) => {
                warn!("Catalog load join error: {}", err);
                false
            }
        }
    })
}
