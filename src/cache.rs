//! Per-path secret memoization.

use crate::error::VaultResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Fetch seam between the cache and the Vault client.
#[async_trait]
pub trait SecretFetcher: Send + Sync {
    /// Retrieve the full record stored at `path`.
    ///
    /// # Errors
    ///
    /// Implementations surface their own transport and authorization
    /// failures.
    async fn fetch(&self, path: &str) -> VaultResult<HashMap<String, String>>;
}

/// Concurrent path → record cache with no expiry.
///
/// Records are stored on first successful fetch and never invalidated.
/// Concurrent first readers of the same path may each fetch, but the
/// first stored record wins and every later lookup observes it.
pub struct SecretCache<F> {
    fetcher: F,
    entries: RwLock<HashMap<String, Arc<HashMap<String, String>>>>,
}

impl<F: SecretFetcher> SecretCache<F> {
    /// Wrap a fetcher with an empty cache.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the record for `path`, fetching it on first access.
    ///
    /// # Errors
    ///
    /// A failed fetch surfaces unchanged and leaves the cache untouched,
    /// so a later call may succeed.
    pub async fn get(&self, path: &str) -> VaultResult<Arc<HashMap<String, String>>> {
        if let Some(record) = self.entries.read().await.get(path) {
            return Ok(Arc::clone(record));
        }

        let record = Arc::new(self.fetcher.fetch(path).await?);
        let mut entries = self.entries.write().await;
        let stored = entries
            .entry(path.to_string())
            .or_insert_with(|| Arc::clone(&record));
        debug!(path, "Cached secret record");
        Ok(Arc::clone(stored))
    }

    /// Number of cached paths.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
