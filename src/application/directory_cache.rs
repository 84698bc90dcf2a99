//! Token Directory Cache
//!
//! Holds one directory snapshot for the whole process. A lookup within the TTL
//! is served from memory; an expired lookup refreshes the snapshot wholesale.
//! If the refresh fails the previous snapshot is served regardless of age.
//!
//! Concurrent expired lookups may both refresh. Both writes are complete
//! snapshots, so the last one simply wins.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::{CachedDirectory, TokenListEntry, DEFAULT_DIRECTORY_TTL};
use crate::ports::{Clock, SystemClock, TokenDirectorySource, UpstreamError};

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Refresh failed and there was nothing cached to fall back on
    #[error("Token directory unavailable: {0}")]
    Unavailable(#[from] UpstreamError),
}

/// Process-wide token directory cache
pub struct DirectoryCache {
    source: Arc<dyn TokenDirectorySource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    snapshot: RwLock<Option<Arc<CachedDirectory>>>,
}

impl DirectoryCache {
    /// Cache with the default 5 minute TTL and the system clock
    pub fn new(source: Arc<dyn TokenDirectorySource>) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), DEFAULT_DIRECTORY_TTL)
    }

    pub fn with_clock(
        source: Arc<dyn TokenDirectorySource>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current snapshot, refreshing it first if it is missing or expired
    pub async fn get_directory(&self) -> Result<Arc<CachedDirectory>, DirectoryError> {
        let now = self.clock.now();

        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            if snapshot.is_fresh(now, self.ttl) {
                tracing::debug!(entries = snapshot.len(), "Using cached token directory");
                return Ok(Arc::clone(snapshot));
            }
        }

        tracing::info!("Fetching fresh token directory");
        match self.source.fetch_directory().await {
            Ok(entries) => {
                let snapshot = Arc::new(CachedDirectory::new(entries, now));
                *self.snapshot.write().await = Some(Arc::clone(&snapshot));
                tracing::info!(entries = snapshot.len(), "Fetched token directory");
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching token directory");
                match self.snapshot.read().await.as_ref() {
                    Some(stale) => {
                        tracing::warn!(
                            fetched_at = %stale.fetched_at(),
                            "Serving stale token directory after refresh failure"
                        );
                        Ok(Arc::clone(stale))
                    }
                    None => Err(DirectoryError::Unavailable(e)),
                }
            }
        }
    }

    /// Directory entry for `symbol` (case-insensitive exact match)
    pub async fn find(&self, symbol: &str) -> Result<Option<TokenListEntry>, DirectoryError> {
        let directory = self.get_directory().await?;
        Ok(directory.find(symbol).cloned())
    }

    /// Snapshot currently held, without refreshing
    pub async fn peek(&self) -> Option<Arc<CachedDirectory>> {
        self.snapshot.read().await.clone()
    }
}
