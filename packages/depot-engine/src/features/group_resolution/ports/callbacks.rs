use crate::errors::Result;
use crate::features::group_resolution::domain::UpdateOutcome;
use depot_storage::{Repository, RepositoryPath};

/// Per-group work driven by upward update propagation
pub trait UpdateCallback: Send + Sync {
    /// Consulted once before any parent is visited
    fn before_update(&self) -> Result<UpdateOutcome> {
        Ok(UpdateOutcome::Proceed)
    }

    /// Called with the artifact's equivalent path inside one parent group
    fn perform_update(&self, group_path: &RepositoryPath) -> Result<()>;
}

/// Per-group work driven by upward cleanup propagation
pub trait GroupCleanupHook: Send + Sync {
    /// `artifact_path` no longer exists anywhere in `group`'s subtree
    fn cleanup_group_when_artifact_path_no_longer_exists_in_sub_tree(
        &self,
        group: &Repository,
        artifact_path: &RepositoryPath,
    ) -> Result<()>;
}
