//! Group repository set collector

use crate::errors::Result;
use depot_storage::{Configuration, ConfigurationManager, Repository, RepositoryKey};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves the member set of a group, optionally flattened to leaves
pub struct GroupRepositorySetCollector {
    configuration: Arc<ConfigurationManager>,
}

impl GroupRepositorySetCollector {
    pub fn new(configuration: Arc<ConfigurationManager>) -> Self {
        Self { configuration }
    }

    /// Members of `group`, ordered and de-duplicated by `storage:repository`
    ///
    /// With `traverse` every group member is replaced by its own expansion, so
    /// only non-group repositories remain.
    pub fn collect(&self, group: &Repository, traverse: bool) -> Result<Vec<Repository>> {
        let configuration = self.configuration.snapshot();
        let members = Self::collect_in(&configuration, group, traverse)?;
        Ok(members.into_iter().cloned().collect())
    }

    /// Same as [`collect`](Self::collect) against an explicit snapshot
    pub fn collect_in<'a>(
        configuration: &'a Configuration,
        group: &Repository,
        traverse: bool,
    ) -> Result<Vec<&'a Repository>> {
        let direct = configuration.resolve_members(group)?;
        if !traverse {
            let mut seen = HashSet::new();
            return Ok(direct
                .into_iter()
                .filter(|member| seen.insert(member.key()))
                .collect());
        }

        let mut expanded: HashSet<RepositoryKey> = HashSet::from([group.key()]);
        let mut seen: HashSet<RepositoryKey> = HashSet::new();
        let mut pending: VecDeque<&Repository> = direct.into_iter().collect();
        let mut leaves = Vec::new();

        while let Some(member) = pending.pop_front() {
            if !member.is_group() {
                if seen.insert(member.key()) {
                    leaves.push(member);
                }
                continue;
            }
            if !expanded.insert(member.key()) {
                if member.key() == group.key() {
                    warn!(group = %group.key(), "Group membership cycle while collecting members");
                } else {
                    debug!(group = %member.key(), "Group already expanded");
                }
                continue;
            }
            // splice the expansion in place of the group to keep declaration order
            for nested in configuration.resolve_members(member)?.into_iter().rev() {
                pending.push_front(nested);
            }
        }

        Ok(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_storage::Storage;
    use pretty_assertions::assert_eq;

    fn ids(members: &[Repository]) -> Vec<String> {
        members.iter().map(|r| r.key().to_string()).collect()
    }

    fn collector(configuration: Configuration) -> GroupRepositorySetCollector {
        GroupRepositorySetCollector::new(Arc::new(ConfigurationManager::new(configuration).unwrap()))
    }

    fn nested() -> Configuration {
        Configuration::new()
            .with_storage(
                Storage::new("storage0")
                    .with_repository(Repository::hosted("storage0", "releases"))
                    .with_repository(Repository::hosted("storage0", "snapshots"))
                    .with_repository(Repository::proxy(
                        "storage0",
                        "central",
                        "https://repo.maven.apache.org/maven2",
                    ))
                    .with_repository(Repository::group("storage0", "inner", &["snapshots", "central"]))
                    .with_repository(Repository::group(
                        "storage0",
                        "public",
                        &["releases", "inner", "storage1:thirdparty", "central"],
                    )),
            )
            .with_storage(
                Storage::new("storage1").with_repository(Repository::hosted("storage1", "thirdparty")),
            )
    }

    #[test]
    fn test_direct_members() {
        let collector = collector(nested());
        let group = Repository::group("storage0", "public", &["releases", "inner", "storage1:thirdparty", "central"]);
        let members = collector.collect(&group, false).unwrap();
        assert_eq!(
            ids(&members),
            vec![
                "storage0:releases",
                "storage0:inner",
                "storage1:thirdparty",
                "storage0:central"
            ]
        );
    }

    #[test]
    fn test_traversed_members_are_leaves_in_order() {
        let config = nested();
        let group = config.repository("storage0", "public").unwrap().clone();
        let members = collector(config).collect(&group, true).unwrap();
        assert_eq!(
            ids(&members),
            vec![
                "storage0:releases",
                "storage0:snapshots",
                "storage0:central",
                "storage1:thirdparty"
            ]
        );
    }

    #[test]
    fn test_cyclic_configuration_terminates() {
        // bypasses load-time validation on purpose
        let config = Configuration::new().with_storage(
            Storage::new("s")
                .with_repository(Repository::hosted("s", "leaf"))
                .with_repository(Repository::group("s", "a", &["b", "leaf"]))
                .with_repository(Repository::group("s", "b", &["a"])),
        );
        let group = config.repository("s", "a").unwrap().clone();
        let members = GroupRepositorySetCollector::collect_in(&config, &group, true).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, "leaf");
    }

    #[test]
    fn test_unknown_member_fails_fast() {
        let config = Configuration::new()
            .with_storage(Storage::new("s").with_repository(Repository::hosted("s", "leaf")));
        let group = Repository::group("s", "g", &["leaf", "missing"]);
        let err = GroupRepositorySetCollector::collect_in(&config, &group, false).unwrap_err();
        assert!(err.to_string().contains("unknown member s:missing"));
    }
}
