//! Derived per-artifact metadata and its store port

use super::path::RepositoryPath;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata derived from an uploaded artifact file
///
/// `version` is the optimistic-concurrency token: a save succeeds only when
/// the stored version still equals the version the entry was read with
/// (0 for a new entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub storage_id: String,
    pub repository_id: String,
    pub path: String,
    pub size_bytes: u64,
    /// Algorithm name (`sha1`, `md5`) → hex digest
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub version: u64,
}

impl ArtifactEntry {
    pub fn new(path: &RepositoryPath) -> Self {
        let now = Utc::now();
        Self {
            storage_id: path.storage_id().to_string(),
            repository_id: path.repository_id().to_string(),
            path: path.relativize().to_string(),
            size_bytes: 0,
            checksums: BTreeMap::new(),
            created: now,
            last_updated: now,
            version: 0,
        }
    }

    pub fn repository_path(&self) -> RepositoryPath {
        RepositoryPath::new(self.storage_id.clone(), self.repository_id.clone(), &self.path)
    }

    pub fn is_new(&self) -> bool {
        self.version == 0
    }
}

/// Artifact entry persistence with optimistic concurrency
///
/// # Implementations
///
/// - `InMemoryArtifactEntryStore`
/// - `SqliteArtifactEntryStore` (feature `sqlite`)
#[async_trait]
pub trait ArtifactEntryStore: Send + Sync {
    async fn find(&self, path: &RepositoryPath) -> Result<Option<ArtifactEntry>>;

    /// Save `entry` expecting `entry.version` to be the stored version
    ///
    /// # Errors
    ///
    /// `ErrorKind::Conflict` when another writer saved first.
    ///
    /// # Returns
    ///
    /// The stored entry with its version incremented.
    async fn save(&self, entry: &ArtifactEntry) -> Result<ArtifactEntry>;

    /// Returns whether an entry was removed
    async fn delete(&self, path: &RepositoryPath) -> Result<bool>;
}
