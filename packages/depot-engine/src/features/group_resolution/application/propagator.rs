//! Upward update and cleanup propagation
//!
//! Starting from a path in a leaf repository, walk every group that
//! (transitively) contains it, bottom-up.
//!
//! ```text
//!            public          ← perform_update(public:/p) third
//!           /      \
//!      inner        \        ← perform_update(inner:/p) second
//!        |           \
//!      leaf ──────────┘      ← stored here; public is also a direct parent
//! ```

use super::existence_checker::GroupArtifactExistenceChecker;
use crate::errors::Result;
use crate::features::group_resolution::domain::{ExistenceMemo, UpdateOutcome};
use crate::features::group_resolution::ports::{
    GroupCleanupHook, RoutingRulesChecker, RoutingRulesSource, UpdateCallback,
};
use crate::features::layout::LayoutRegistry;
use depot_storage::{Configuration, ConfigurationManager, Repository, RepositoryKey, RepositoryPath};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct GroupRepositoryPropagator {
    configuration: Arc<ConfigurationManager>,
    routing: Arc<dyn RoutingRulesSource>,
    existence: Arc<GroupArtifactExistenceChecker>,
    layouts: Arc<LayoutRegistry>,
}

impl GroupRepositoryPropagator {
    pub fn new(
        configuration: Arc<ConfigurationManager>,
        routing: Arc<dyn RoutingRulesSource>,
        existence: Arc<GroupArtifactExistenceChecker>,
        layouts: Arc<LayoutRegistry>,
    ) -> Self {
        Self {
            configuration,
            routing,
            existence,
            layouts,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Update
    // ═══════════════════════════════════════════════════════════════════════

    /// Invoke `callback` at every group above `path`'s repository
    ///
    /// A parent whose edge is denied by routing rules gets no callback and is
    /// not walked through; other routes upward are unaffected. Rules and
    /// membership come from the same configuration snapshot.
    pub fn update_groups_containing(
        &self,
        path: &RepositoryPath,
        callback: &dyn UpdateCallback,
    ) -> Result<()> {
        if callback.before_update()? == UpdateOutcome::Stop {
            debug!(path = %path, "Update propagation stopped by callback");
            return Ok(());
        }

        let configuration = self.configuration.snapshot();
        let routing = self.routing.rules_for(&configuration)?;
        let leaf = configuration.repository(path.storage_id(), path.repository_id())?;
        let mut leaf_route = vec![leaf];
        self.update_upward(&configuration, routing.as_ref(), path, &mut leaf_route, callback)
    }

    fn update_upward<'a>(
        &self,
        configuration: &'a Configuration,
        routing: &dyn RoutingRulesChecker,
        path: &RepositoryPath,
        leaf_route: &mut Vec<&'a Repository>,
        callback: &dyn UpdateCallback,
    ) -> Result<()> {
        let relative = path.relativize();
        for parent in configuration.group_repositories_containing(path.storage_id(), path.repository_id()) {
            if leaf_route.iter().any(|r| r.key() == parent.key()) {
                warn!(group = %parent.key(), path = %path, "Group membership cycle during update propagation");
                continue;
            }

            if denied_on_route(routing, parent, leaf_route, relative) {
                debug!(group = %parent.key(), path = relative, "Update denied by routing rules");
                continue;
            }

            let parent_path = self.layouts.for_repository(parent)?.resolve(parent, relative);
            callback.perform_update(&parent_path)?;

            leaf_route.push(parent);
            let result = self.update_upward(configuration, routing, &parent_path, leaf_route, callback);
            leaf_route.pop();
            result?;
        }
        Ok(())
    }

    /// Whether any repository on `leaf_route` is denied from `group` for `artifact_path`
    ///
    /// Evaluated against the current configuration. Rules that fail to compile
    /// deny everything.
    pub fn is_operation_denied_by_routing_rules(
        &self,
        group: &Repository,
        leaf_route: &[&Repository],
        artifact_path: &str,
    ) -> bool {
        match self.routing.rules_for(&self.configuration.snapshot()) {
            Ok(routing) => denied_on_route(routing.as_ref(), group, leaf_route, artifact_path),
            Err(err) => {
                warn!(group = %group.key(), error = %err, "Routing rules unavailable, denying");
                true
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Cleanup
    // ═══════════════════════════════════════════════════════════════════════

    /// Invoke `hook` at every group above `path`'s repository whose subtree
    /// no longer holds the artifact
    pub fn cleanup_groups_containing(
        &self,
        path: &RepositoryPath,
        hook: &dyn GroupCleanupHook,
    ) -> Result<()> {
        let configuration = self.configuration.snapshot();
        let mut memo = ExistenceMemo::new();
        let mut route = HashSet::from([path.repository_key()]);
        self.cleanup_upward(&configuration, path, &mut memo, &mut route, hook)
    }

    fn cleanup_upward(
        &self,
        configuration: &Configuration,
        path: &RepositoryPath,
        memo: &mut ExistenceMemo,
        route: &mut HashSet<RepositoryKey>,
        hook: &dyn GroupCleanupHook,
    ) -> Result<()> {
        let relative = path.relativize();
        for parent in configuration.group_repositories_containing(path.storage_id(), path.repository_id()) {
            let key = parent.key();
            if !route.insert(key.clone()) {
                warn!(group = %key, path = %path, "Group membership cycle during cleanup propagation");
                continue;
            }

            let parent_path = self.layouts.for_repository(parent)?.resolve(parent, relative);
            let result = self
                .existence
                .exists_in_subtree_with(configuration, parent, relative, memo)
                .and_then(|exists| {
                    if exists {
                        debug!(group = %key, path = relative, "Artifact still present in group subtree");
                        Ok(())
                    } else {
                        hook.cleanup_group_when_artifact_path_no_longer_exists_in_sub_tree(parent, &parent_path)
                    }
                })
                .and_then(|_| self.cleanup_upward(configuration, &parent_path, memo, route, hook));
            route.remove(&key);
            result?;
        }
        Ok(())
    }
}

fn denied_on_route(
    routing: &dyn RoutingRulesChecker,
    group: &Repository,
    leaf_route: &[&Repository],
    artifact_path: &str,
) -> bool {
    leaf_route
        .iter()
        .any(|repository| routing.is_denied(group, &RepositoryPath::of(repository, artifact_path)))
}
