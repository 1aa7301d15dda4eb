//! Repository paths
//!
//! A `RepositoryPath` names a location inside one repository's storage tree.
//! It never touches the filesystem itself; existence and content are asked
//! through [`RepositoryFiles`](super::RepositoryFiles).

use super::repository::{Repository, RepositoryKey};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryPath {
    storage_id: String,
    repository_id: String,
    relative: String,
}

impl RepositoryPath {
    pub fn new(
        storage_id: impl Into<String>,
        repository_id: impl Into<String>,
        relative: &str,
    ) -> Self {
        Self {
            storage_id: storage_id.into(),
            repository_id: repository_id.into(),
            relative: normalize(relative),
        }
    }

    /// Path inside `repository`
    pub fn of(repository: &Repository, relative: &str) -> Self {
        Self::new(repository.storage_id.clone(), repository.id.clone(), relative)
    }

    /// Repository root
    pub fn root(repository: &Repository) -> Self {
        Self::of(repository, "")
    }

    pub fn storage_id(&self) -> &str {
        &self.storage_id
    }

    pub fn repository_id(&self) -> &str {
        &self.repository_id
    }

    pub fn repository_key(&self) -> RepositoryKey {
        RepositoryKey::new(self.storage_id.clone(), self.repository_id.clone())
    }

    /// Layout-relative path (no leading slash)
    pub fn relativize(&self) -> &str {
        &self.relative
    }

    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }

    pub fn resolve(&self, child: &str) -> Self {
        let child = normalize(child);
        let relative = match (self.relative.is_empty(), child.is_empty()) {
            (true, _) => child,
            (false, true) => self.relative.clone(),
            (false, false) => format!("{}/{}", self.relative, child),
        };
        Self {
            storage_id: self.storage_id.clone(),
            repository_id: self.repository_id.clone(),
            relative,
        }
    }

    pub fn resolve_sibling(&self, name: &str) -> Self {
        match self.parent() {
            Some(parent) => parent.resolve(name),
            None => self.clone(),
        }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.relative.is_empty() {
            return None;
        }
        let parent = match self.relative.rfind('/') {
            Some(idx) => self.relative[..idx].to_string(),
            None => String::new(),
        };
        Some(Self {
            storage_id: self.storage_id.clone(),
            repository_id: self.repository_id.clone(),
            relative: parent,
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        if self.relative.is_empty() {
            return None;
        }
        self.relative.rsplit('/').next()
    }

    /// Sidecar next to this file, e.g. `a-1.0.jar` → `a-1.0.jar.sha1`
    pub fn sidecar(&self, extension: &str) -> Self {
        Self {
            storage_id: self.storage_id.clone(),
            repository_id: self.repository_id.clone(),
            relative: format!("{}.{}", self.relative, extension.trim_start_matches('.')),
        }
    }

    /// Same relative path inside another repository
    pub fn with_repository(&self, repository: &Repository) -> Self {
        Self {
            storage_id: repository.storage_id.clone(),
            repository_id: repository.id.clone(),
            relative: self.relative.clone(),
        }
    }

    /// Key used for path-scoped locking: `storage:repository:relative`
    pub fn lock_key(&self) -> String {
        format!("{}:{}:{}", self.storage_id, self.repository_id, self.relative)
    }
}

impl fmt::Display for RepositoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.storage_id, self.repository_id, self.relative)
    }
}

/// Strip empty and `.` segments, unify separators
fn normalize(relative: &str) -> String {
    relative
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
