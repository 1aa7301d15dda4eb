//! Group artifact existence checker
//!
//! Depth-first walk over a group's subtree asking each non-group member
//! whether it holds the artifact. The walk stops at the first hit; a memo
//! keyed by `storage:repository` makes each repository's predicate run at
//! most once per top-level call and breaks membership cycles.

use crate::errors::{EngineError, Result};
use crate::features::group_resolution::domain::{ExistenceMemo, MemoState};
use crate::features::layout::LayoutRegistry;
use depot_storage::{Configuration, ConfigurationManager, Repository, RepositoryFiles};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct GroupArtifactExistenceChecker {
    configuration: Arc<ConfigurationManager>,
    files: Arc<dyn RepositoryFiles>,
    layouts: Arc<LayoutRegistry>,
}

impl GroupArtifactExistenceChecker {
    pub fn new(
        configuration: Arc<ConfigurationManager>,
        files: Arc<dyn RepositoryFiles>,
        layouts: Arc<LayoutRegistry>,
    ) -> Self {
        Self {
            configuration,
            files,
            layouts,
        }
    }

    /// Whether `artifact_path` exists in any repository below `group`
    pub fn artifact_exists_in_group_subtree(
        &self,
        group: &Repository,
        artifact_path: &str,
    ) -> Result<bool> {
        let mut memo = ExistenceMemo::new();
        self.exists_in_subtree(group, artifact_path, &mut memo)
    }

    /// Existence check sharing `memo` with the caller's other checks
    pub fn exists_in_subtree(
        &self,
        group: &Repository,
        artifact_path: &str,
        memo: &mut ExistenceMemo,
    ) -> Result<bool> {
        let configuration = self.configuration.snapshot();
        self.exists_in_subtree_with(&configuration, group, artifact_path, memo)
    }

    /// Existence check against an explicit configuration snapshot
    ///
    /// A failing member counts as not holding the artifact and the remaining
    /// members are still asked. When nothing is found and some member failed,
    /// the first failure is returned instead of `false`.
    pub fn exists_in_subtree_with(
        &self,
        configuration: &Configuration,
        group: &Repository,
        artifact_path: &str,
        memo: &mut ExistenceMemo,
    ) -> Result<bool> {
        let mut branch_error = None;
        if self.walk(configuration, group, artifact_path, memo, &mut branch_error)? {
            return Ok(true);
        }
        match branch_error {
            Some(err) => Err(err),
            None => Ok(false),
        }
    }

    fn walk(
        &self,
        configuration: &Configuration,
        group: &Repository,
        artifact_path: &str,
        memo: &mut ExistenceMemo,
        branch_error: &mut Option<EngineError>,
    ) -> Result<bool> {
        let group_key = group.key();
        memo.mark_visited(&group_key);

        for member in configuration.resolve_members(group)? {
            let key = member.key();
            match memo.state(&key) {
                MemoState::Found => {
                    memo.mark_found(&group_key);
                    return Ok(true);
                }
                MemoState::Visited => continue,
                MemoState::Unknown => {}
            }

            let found = if member.is_group() {
                self.walk(configuration, member, artifact_path, memo, branch_error)?
            } else {
                let found = self.leaf_contains(member, artifact_path, branch_error)?;
                if !found {
                    memo.mark_visited(&key);
                }
                found
            };

            if found {
                debug!(group = %group_key, member = %key, path = artifact_path, "Artifact found in group subtree");
                memo.mark_found(&key);
                memo.mark_found(&group_key);
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn leaf_contains(
        &self,
        repository: &Repository,
        artifact_path: &str,
        branch_error: &mut Option<EngineError>,
    ) -> Result<bool> {
        let layout = self.layouts.for_repository(repository)?;
        let candidate = layout.resolve(repository, artifact_path);
        match layout.artifact_exists(self.files.as_ref(), &candidate) {
            Ok(found) => Ok(found),
            Err(err) => {
                warn!(path = %candidate, error = %err, "Existence check failed, treating branch as absent");
                if branch_error.is_none() {
                    *branch_error = Some(EngineError::Io(err));
                }
                Ok(false)
            }
        }
    }
}
