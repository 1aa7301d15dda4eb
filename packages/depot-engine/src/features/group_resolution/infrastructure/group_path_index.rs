//! In-memory index of artifact paths visible through each group

use crate::errors::Result;
use crate::features::group_resolution::ports::{GroupCleanupHook, UpdateCallback};
use dashmap::DashMap;
use depot_storage::{Repository, RepositoryKey, RepositoryPath};
use std::collections::BTreeSet;
use tracing::debug;

/// Group key → relative paths served through that group
///
/// Fed by update propagation (insert) and cleanup propagation (remove).
#[derive(Debug, Default)]
pub struct GroupPathIndex {
    paths: DashMap<RepositoryKey, BTreeSet<String>>,
}

impl GroupPathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, group: &RepositoryKey, relative: &str) -> bool {
        self.paths
            .get(group)
            .map(|paths| paths.contains(relative))
            .unwrap_or(false)
    }

    pub fn paths(&self, group: &RepositoryKey) -> Vec<String> {
        self.paths
            .get(group)
            .map(|paths| paths.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.paths.iter().map(|entry| entry.len()).sum()
    }
}

impl UpdateCallback for GroupPathIndex {
    fn perform_update(&self, group_path: &RepositoryPath) -> Result<()> {
        let inserted = self
            .paths
            .entry(group_path.repository_key())
            .or_default()
            .insert(group_path.relativize().to_string());
        if inserted {
            debug!(path = %group_path, "Indexed group path");
        }
        Ok(())
    }
}

impl GroupCleanupHook for GroupPathIndex {
    fn cleanup_group_when_artifact_path_no_longer_exists_in_sub_tree(
        &self,
        group: &Repository,
        artifact_path: &RepositoryPath,
    ) -> Result<()> {
        if let Some(mut paths) = self.paths.get_mut(&group.key()) {
            if paths.remove(artifact_path.relativize()) {
                debug!(path = %artifact_path, "Removed group path from index");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_then_cleanup() {
        let index = GroupPathIndex::new();
        let group = Repository::group("s", "public", &["releases"]);
        let path = RepositoryPath::of(&group, "a/1/a-1.jar");

        index.perform_update(&path).unwrap();
        index.perform_update(&path).unwrap();
        assert!(index.contains(&group.key(), "a/1/a-1.jar"));
        assert_eq!(index.total(), 1);

        index
            .cleanup_group_when_artifact_path_no_longer_exists_in_sub_tree(&group, &path)
            .unwrap();
        assert!(!index.contains(&group.key(), "a/1/a-1.jar"));
        assert!(index.paths(&group.key()).is_empty());
    }
}
