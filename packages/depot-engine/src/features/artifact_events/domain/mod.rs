//! Artifact event types

use depot_storage::RepositoryPath;
use std::fmt;

/// File-level change in a leaf repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactEvent {
    /// Uploaded through the hosting API
    Uploaded(RepositoryPath),
    /// Stored by fetch-through into a proxy cache
    Stored(RepositoryPath),
    Deleted(RepositoryPath),
}

impl ArtifactEvent {
    pub fn path(&self) -> &RepositoryPath {
        match self {
            ArtifactEvent::Uploaded(path)
            | ArtifactEvent::Stored(path)
            | ArtifactEvent::Deleted(path) => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ArtifactEvent::Uploaded(_) => "uploaded",
            ArtifactEvent::Stored(_) => "stored",
            ArtifactEvent::Deleted(_) => "deleted",
        }
    }
}

impl fmt::Display for ArtifactEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.path())
    }
}
