//! Routes artifact events to entry persistence and group propagation

use super::entry_handler::ArtifactEntryHandler;
use crate::errors::{EngineError, Result};
use crate::features::artifact_events::domain::ArtifactEvent;
use crate::features::group_resolution::{GroupCleanupHook, GroupRepositoryPropagator, UpdateCallback};
use depot_storage::RepositoryPath;
use std::sync::Arc;
use tracing::debug;

/// - uploaded / stored: save the entry, then update every enclosing group
/// - deleted: drop the entry, then clean up groups that lost the artifact
pub struct ArtifactEventDispatcher {
    entries: Arc<ArtifactEntryHandler>,
    propagator: Arc<GroupRepositoryPropagator>,
    update_callback: Arc<dyn UpdateCallback>,
    cleanup_hook: Arc<dyn GroupCleanupHook>,
}

impl ArtifactEventDispatcher {
    pub fn new(
        entries: Arc<ArtifactEntryHandler>,
        propagator: Arc<GroupRepositoryPropagator>,
        update_callback: Arc<dyn UpdateCallback>,
        cleanup_hook: Arc<dyn GroupCleanupHook>,
    ) -> Self {
        Self {
            entries,
            propagator,
            update_callback,
            cleanup_hook,
        }
    }

    pub async fn dispatch(&self, event: &ArtifactEvent) -> Result<()> {
        debug!(event = %event, "Dispatching artifact event");
        match event {
            ArtifactEvent::Uploaded(path) | ArtifactEvent::Stored(path) => {
                self.entries.on_artifact_uploaded(path).await?;
                self.propagate_update(path.clone()).await
            }
            ArtifactEvent::Deleted(path) => {
                self.entries.on_artifact_deleted(path).await?;
                self.propagate_cleanup(path.clone()).await
            }
        }
    }

    // graph walks hit the filesystem, keep them off the async workers
    async fn propagate_update(&self, path: RepositoryPath) -> Result<()> {
        let propagator = self.propagator.clone();
        let callback = self.update_callback.clone();
        tokio::task::spawn_blocking(move || {
            propagator.update_groups_containing(&path, callback.as_ref())
        })
        .await
        .map_err(|e| EngineError::worker_pool(format!("update propagation panicked: {}", e)))?
    }

    async fn propagate_cleanup(&self, path: RepositoryPath) -> Result<()> {
        let propagator = self.propagator.clone();
        let hook = self.cleanup_hook.clone();
        tokio::task::spawn_blocking(move || {
            propagator.cleanup_groups_containing(&path, hook.as_ref())
        })
        .await
        .map_err(|e| EngineError::worker_pool(format!("cleanup propagation panicked: {}", e)))?
    }
}
