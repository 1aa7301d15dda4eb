//! In-memory adapters (tests, ephemeral deployments)

use crate::domain::{ArtifactEntry, ArtifactEntryStore, RepositoryFiles, RepositoryPath};
use crate::{Result, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::io;

/// `RepositoryFiles` backed by a concurrent map
///
/// A path "exists" when a file is stored at it or below it (directory).
#[derive(Debug, Default)]
pub struct InMemoryRepositoryFiles {
    files: DashMap<RepositoryPath, Vec<u8>>,
}

impl InMemoryRepositoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl RepositoryFiles for InMemoryRepositoryFiles {
    fn exists(&self, path: &RepositoryPath) -> io::Result<bool> {
        if self.files.contains_key(path) {
            return Ok(true);
        }
        let prefix = if path.is_root() {
            String::new()
        } else {
            format!("{}/", path.relativize())
        };
        Ok(self.files.iter().any(|entry| {
            let key = entry.key();
            key.storage_id() == path.storage_id()
                && key.repository_id() == path.repository_id()
                && key.relativize().starts_with(&prefix)
        }))
    }

    fn read_to_string(&self, path: &RepositoryPath) -> io::Result<Option<String>> {
        match self.files.get(path) {
            Some(bytes) => String::from_utf8(bytes.value().clone())
                .map(Some)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            None => Ok(None),
        }
    }

    fn size(&self, path: &RepositoryPath) -> io::Result<Option<u64>> {
        Ok(self.files.get(path).map(|bytes| bytes.len() as u64))
    }

    fn write(&self, path: &RepositoryPath, bytes: &[u8]) -> io::Result<()> {
        self.files.insert(path.clone(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, path: &RepositoryPath) -> io::Result<bool> {
        Ok(self.files.remove(path).is_some())
    }
}

/// `ArtifactEntryStore` backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryArtifactEntryStore {
    entries: DashMap<String, ArtifactEntry>,
}

impl InMemoryArtifactEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ArtifactEntryStore for InMemoryArtifactEntryStore {
    async fn find(&self, path: &RepositoryPath) -> Result<Option<ArtifactEntry>> {
        Ok(self.entries.get(&path.lock_key()).map(|e| e.value().clone()))
    }

    async fn save(&self, entry: &ArtifactEntry) -> Result<ArtifactEntry> {
        let key = entry.repository_path().lock_key();
        let mut saved = entry.clone();
        saved.version = entry.version + 1;
        saved.last_updated = Utc::now();

        // The entry guard makes compare-and-swap atomic per key
        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().version != entry.version {
                    return Err(StorageError::conflict(key, entry.version));
                }
                occupied.insert(saved.clone());
            }
            Entry::Vacant(vacant) => {
                if !entry.is_new() {
                    return Err(StorageError::conflict(key, entry.version));
                }
                vacant.insert(saved.clone());
            }
        }
        Ok(saved)
    }

    async fn delete(&self, path: &RepositoryPath) -> Result<bool> {
        Ok(self.entries.remove(&path.lock_key()).is_some())
    }
}
