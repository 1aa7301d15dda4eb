//! In-memory repository configuration and its YAML schema (v1)
//!
//! # Examples
//!
//! ```rust
//! use depot_storage::domain::Configuration;
//!
//! let yaml = r#"
//! version: 1
//! storages:
//!   - id: storage0
//!     repositories:
//!       - id: releases
//!         type: hosted
//!       - id: public
//!         type: group
//!         members: [releases]
//! "#;
//!
//! let config = Configuration::from_yaml_str(yaml).unwrap();
//! let parents = config.group_repositories_containing("storage0", "releases");
//! assert_eq!(parents[0].id, "public");
//! ```

use super::repository::{Repository, RepositoryKey, RepositoryType, Storage};
use super::routing::RoutingRule;
use crate::{Result, StorageError};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Supported configuration schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

// ═══════════════════════════════════════════════════════════════════════════
// YAML Schema v1
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigurationFileV1 {
    version: Option<u32>,
    #[serde(default)]
    storages: Vec<StorageFileV1>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    routing_rules: Vec<RoutingRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorageFileV1 {
    id: String,
    #[serde(default)]
    repositories: Vec<Repository>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════

/// Storages → repositories graph plus routing rules
///
/// Immutable while shared; mutations go through
/// [`ConfigurationManager`](super::ConfigurationManager) which swaps whole
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Configuration {
    storages: BTreeMap<String, Storage>,
    routing_rules: Vec<RoutingRule>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.add_storage(storage);
        self
    }

    pub fn with_routing_rule(mut self, rule: RoutingRule) -> Self {
        self.routing_rules.push(rule);
        self
    }

    pub fn add_storage(&mut self, storage: Storage) -> Option<Storage> {
        self.storages.insert(storage.id.clone(), storage)
    }

    pub fn storage_mut(&mut self, storage_id: &str) -> Option<&mut Storage> {
        self.storages.get_mut(storage_id)
    }

    pub fn get_storage(&self, storage_id: &str) -> Option<&Storage> {
        self.storages.get(storage_id)
    }

    pub fn storages(&self) -> impl Iterator<Item = &Storage> {
        self.storages.values()
    }

    pub fn routing_rules(&self) -> &[RoutingRule] {
        &self.routing_rules
    }

    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.storages.values().flat_map(|s| s.repositories())
    }

    /// Look up a repository, failing with a not-found error
    pub fn repository(&self, storage_id: &str, repository_id: &str) -> Result<&Repository> {
        let storage = self
            .get_storage(storage_id)
            .ok_or_else(|| StorageError::storage_not_found(storage_id))?;
        storage
            .get_repository(repository_id)
            .ok_or_else(|| StorageError::repository_not_found(storage_id, repository_id))
    }

    pub fn repository_by_key(&self, key: &RepositoryKey) -> Result<&Repository> {
        self.repository(&key.storage_id, &key.repository_id)
    }

    /// Direct members of a group, resolved in declaration order
    ///
    /// An unknown member reference is a configuration error.
    pub fn resolve_members<'a>(&'a self, group: &Repository) -> Result<Vec<&'a Repository>> {
        group
            .member_keys()
            .map(|key| {
                self.repository_by_key(&key).map_err(|_| {
                    StorageError::config(format!(
                        "Group {} references unknown member {}",
                        group.key(),
                        key
                    ))
                })
            })
            .collect()
    }

    /// Groups that list `storage_id:repository_id` as a direct member
    pub fn group_repositories_containing(
        &self,
        storage_id: &str,
        repository_id: &str,
    ) -> Vec<&Repository> {
        let key = RepositoryKey::new(storage_id, repository_id);
        self.repositories()
            .filter(|repository| repository.has_member(&key))
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Validation
    // ═══════════════════════════════════════════════════════════════════════

    /// Structural validation run at load time
    ///
    /// - storage and repository ids are single path components
    /// - group members resolve
    /// - only groups declare members, only proxies declare a remote
    /// - the group membership graph is acyclic
    pub fn validate(&self) -> Result<()> {
        for storage in self.storages() {
            check_id("Storage", &storage.id)?;
        }

        for repository in self.repositories() {
            check_id("Repository", &repository.id)?;
            match repository.repository_type {
                RepositoryType::Group => {
                    self.resolve_members(repository)?;
                }
                RepositoryType::Proxy => {
                    if repository.remote.is_none() {
                        return Err(StorageError::config(format!(
                            "Proxy repository {} has no remote url",
                            repository.key()
                        )));
                    }
                }
                RepositoryType::Hosted => {}
            }

            if !repository.is_group() && !repository.members.is_empty() {
                return Err(StorageError::config(format!(
                    "Repository {} is {} but declares group members",
                    repository.key(),
                    repository.repository_type
                )));
            }
        }

        self.check_group_cycles()
    }

    fn check_group_cycles(&self) -> Result<()> {
        let mut graph: DiGraph<RepositoryKey, ()> = DiGraph::new();
        let mut nodes: HashMap<RepositoryKey, NodeIndex> = HashMap::new();

        for repository in self.repositories() {
            let key = repository.key();
            nodes.insert(key.clone(), graph.add_node(key));
        }

        for group in self.repositories().filter(|r| r.is_group()) {
            let from = nodes[&group.key()];
            for member in group.member_keys() {
                if let Some(&to) = nodes.get(&member) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        toposort(&graph, None).map(|_| ()).map_err(|cycle| {
            StorageError::config(format!(
                "Group membership cycle detected at {}",
                graph[cycle.node_id()]
            ))
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // YAML I/O
    // ═══════════════════════════════════════════════════════════════════════

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConfigurationFileV1 = serde_yaml::from_str(yaml)?;

        match file.version {
            None => {
                return Err(StorageError::config(
                    "Missing 'version' field in configuration file. Add 'version: 1' to the top of your YAML file.",
                ))
            }
            Some(version) if !SUPPORTED_VERSIONS.contains(&version) => {
                return Err(StorageError::config(format!(
                    "Unsupported configuration version {}",
                    version
                )))
            }
            Some(_) => {}
        }

        let mut config = Configuration::new();
        for storage_file in file.storages {
            if config.get_storage(&storage_file.id).is_some() {
                return Err(StorageError::config(format!(
                    "Duplicate storage id {}",
                    storage_file.id
                )));
            }
            let mut storage = Storage::new(storage_file.id);
            for repository in storage_file.repositories {
                let id = repository.id.clone();
                if storage.add_repository(repository).is_some() {
                    return Err(StorageError::config(format!(
                        "Duplicate repository id {}:{}",
                        storage.id, id
                    )));
                }
            }
            config.add_storage(storage);
        }
        config.routing_rules = file.routing_rules;

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StorageError::io(format!(
                "Failed to read configuration {}: {}",
                path.as_ref().display(),
                e
            ))
            .with_source(e)
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        let file = ConfigurationFileV1 {
            version: Some(1),
            storages: self
                .storages
                .values()
                .map(|storage| StorageFileV1 {
                    id: storage.id.clone(),
                    repositories: storage.repositories().cloned().collect(),
                })
                .collect(),
            routing_rules: self.routing_rules.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

/// Ids name directories under the storage root and appear in `storage:repository` keys
fn check_id(kind: &str, id: &str) -> Result<()> {
    let invalid = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', ':'])
        || id.chars().any(char::is_control);
    if invalid {
        return Err(StorageError::config(format!("{} id {:?} is not a valid name", kind, id)));
    }
    Ok(())
}
