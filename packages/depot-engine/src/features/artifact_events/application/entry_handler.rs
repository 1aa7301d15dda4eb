//! Artifact entry persistence on upload / delete
//!
//! Derives an `ArtifactEntry` (size, sidecar checksums) from the stored file
//! and saves it under a per-path lock. The store's optimistic version check
//! can still fail when another process wrote the same entry; such conflicts
//! are retried with a short fixed backoff.

use super::path_locks::PathLockManager;
use crate::config::ArtifactEventConfig;
use crate::errors::Result;
use crate::features::metadata_expiration::{normalize_checksum, ChecksumAlgorithm};
use chrono::Utc;
use depot_storage::{ArtifactEntry, ArtifactEntryStore, RepositoryFiles, RepositoryPath};
use std::sync::Arc;
use tracing::{debug, error};

pub struct ArtifactEntryHandler {
    store: Arc<dyn ArtifactEntryStore>,
    files: Arc<dyn RepositoryFiles>,
    locks: Arc<PathLockManager>,
    config: ArtifactEventConfig,
}

impl ArtifactEntryHandler {
    pub fn new(
        store: Arc<dyn ArtifactEntryStore>,
        files: Arc<dyn RepositoryFiles>,
        locks: Arc<PathLockManager>,
        config: ArtifactEventConfig,
    ) -> Self {
        Self {
            store,
            files,
            locks,
            config,
        }
    }

    /// Create or refresh the entry for an uploaded/stored artifact
    pub async fn on_artifact_uploaded(&self, path: &RepositoryPath) -> Result<ArtifactEntry> {
        let guard = self.locks.acquire(path).await;
        let result = self.save_with_retry(path).await;
        drop(guard);
        self.locks.release(path);
        result
    }

    /// Remove the entry of a deleted artifact
    pub async fn on_artifact_deleted(&self, path: &RepositoryPath) -> Result<bool> {
        let guard = self.locks.acquire(path).await;
        let result = self.store.delete(path).await;
        drop(guard);
        self.locks.release(path);
        Ok(result?)
    }

    async fn save_with_retry(&self, path: &RepositoryPath) -> Result<ArtifactEntry> {
        let mut retries = 0;
        loop {
            match self.save_entry(path).await {
                Ok(entry) => return Ok(entry),
                Err(err) if err.is_conflict() && retries < self.config.max_retries => {
                    retries += 1;
                    debug!(path = %path, retries, "Artifact entry conflict, retrying");
                    tokio::time::sleep(self.config.retry_backoff()).await;
                }
                Err(err) => {
                    error!(path = %path, retries, error = %err, "Failed to save artifact entry");
                    return Err(err);
                }
            }
        }
    }

    async fn save_entry(&self, path: &RepositoryPath) -> Result<ArtifactEntry> {
        let mut entry = self
            .store
            .find(path)
            .await?
            .unwrap_or_else(|| ArtifactEntry::new(path));

        entry.size_bytes = self.files.size(path)?.unwrap_or(0);
        for algorithm in ChecksumAlgorithm::FALLBACK_ORDER {
            let sidecar = path.sidecar(algorithm.extension());
            if let Some(checksum) = self
                .files
                .read_to_string(&sidecar)?
                .as_deref()
                .and_then(normalize_checksum)
            {
                entry.checksums.insert(algorithm.extension().to_string(), checksum);
            }
        }
        entry.last_updated = Utc::now();

        Ok(self.store.save(&entry).await?)
    }
}
