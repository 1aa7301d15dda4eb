//! Storage / Repository model
//!
//! A `Storage` owns repositories keyed by id. A repository keeps its owning
//! storage as an id (back-reference, not ownership) so the whole graph can be
//! shared behind one `Arc<Configuration>` snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Layout used when a repository does not declare one
pub const DEFAULT_LAYOUT: &str = "maven2";

/// Repository kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryType {
    /// Local artifacts
    Hosted,
    /// Remote pass-through with a local cache
    Proxy,
    /// Virtual aggregate of member repositories
    Group,
}

impl RepositoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryType::Hosted => "hosted",
            RepositoryType::Proxy => "proxy",
            RepositoryType::Group => "group",
        }
    }
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fully qualified repository identity: `storageId:repositoryId`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryKey {
    pub storage_id: String,
    pub repository_id: String,
}

impl RepositoryKey {
    pub fn new(storage_id: impl Into<String>, repository_id: impl Into<String>) -> Self {
        Self {
            storage_id: storage_id.into(),
            repository_id: repository_id.into(),
        }
    }
}

impl fmt::Display for RepositoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.storage_id, self.repository_id)
    }
}

/// Group member reference as declared in configuration
///
/// Either a bare repository id (resolved in the group's own storage) or
/// `storageId:repositoryId` for a cross-storage member.
///
/// ```rust
/// use depot_storage::domain::MemberRef;
///
/// let same = MemberRef::parse("releases");
/// assert_eq!(same.resolve("storage0").to_string(), "storage0:releases");
///
/// let cross = MemberRef::parse("storage-common:central");
/// assert_eq!(cross.resolve("storage0").to_string(), "storage-common:central");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MemberRef {
    pub storage_id: Option<String>,
    pub repository_id: String,
}

impl MemberRef {
    pub fn parse(reference: &str) -> Self {
        match reference.split_once(':') {
            Some((storage_id, repository_id)) => Self {
                storage_id: Some(storage_id.to_string()),
                repository_id: repository_id.to_string(),
            },
            None => Self {
                storage_id: None,
                repository_id: reference.to_string(),
            },
        }
    }

    /// Resolve against the storage that declares the group
    pub fn resolve(&self, owner_storage_id: &str) -> RepositoryKey {
        RepositoryKey::new(
            self.storage_id.as_deref().unwrap_or(owner_storage_id),
            self.repository_id.clone(),
        )
    }
}

impl From<String> for MemberRef {
    fn from(value: String) -> Self {
        MemberRef::parse(&value)
    }
}

impl From<MemberRef> for String {
    fn from(value: MemberRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.storage_id {
            Some(storage_id) => write!(f, "{}:{}", storage_id, self.repository_id),
            None => write!(f, "{}", self.repository_id),
        }
    }
}

/// Remote settings of a proxy repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteRepository {
    /// Remote origin base URL
    pub url: String,
    /// Track remote aliveness for this repository
    #[serde(default = "default_true")]
    pub alive_check: bool,
    /// Compare checksum sidecars before re-fetching metadata
    #[serde(default = "default_true")]
    pub checksum_policy: bool,
}

fn default_true() -> bool {
    true
}

impl RemoteRepository {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alive_check: true,
            checksum_policy: true,
        }
    }
}

/// A named artifact container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Repository {
    pub id: String,
    /// Owning storage (filled in when the repository is added to a storage)
    #[serde(skip)]
    pub storage_id: String,
    #[serde(rename = "type")]
    pub repository_type: RepositoryType,
    #[serde(default = "default_layout")]
    pub layout: String,
    /// Ordered member references (groups only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberRef>,
    /// Remote origin (proxies only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteRepository>,
}

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

impl Repository {
    fn base(storage_id: &str, id: &str, repository_type: RepositoryType) -> Self {
        Self {
            id: id.to_string(),
            storage_id: storage_id.to_string(),
            repository_type,
            layout: default_layout(),
            members: Vec::new(),
            remote: None,
        }
    }

    pub fn hosted(storage_id: &str, id: &str) -> Self {
        Self::base(storage_id, id, RepositoryType::Hosted)
    }

    pub fn proxy(storage_id: &str, id: &str, url: &str) -> Self {
        let mut repository = Self::base(storage_id, id, RepositoryType::Proxy);
        repository.remote = Some(RemoteRepository::new(url));
        repository
    }

    /// Group with members given as `"repo"` or `"storage:repo"`
    pub fn group(storage_id: &str, id: &str, members: &[&str]) -> Self {
        let mut repository = Self::base(storage_id, id, RepositoryType::Group);
        repository.members = members.iter().map(|m| MemberRef::parse(m)).collect();
        repository
    }

    pub fn with_layout(mut self, layout: &str) -> Self {
        self.layout = layout.to_string();
        self
    }

    pub fn key(&self) -> RepositoryKey {
        RepositoryKey::new(self.storage_id.clone(), self.id.clone())
    }

    pub fn is_group(&self) -> bool {
        self.repository_type == RepositoryType::Group
    }

    pub fn is_proxy(&self) -> bool {
        self.repository_type == RepositoryType::Proxy
    }

    /// Member keys in declaration order
    pub fn member_keys(&self) -> impl Iterator<Item = RepositoryKey> + '_ {
        self.members.iter().map(|m| m.resolve(&self.storage_id))
    }

    /// Whether `key` is a direct member of this group
    pub fn has_member(&self, key: &RepositoryKey) -> bool {
        self.is_group() && self.member_keys().any(|k| &k == key)
    }
}

/// Top-level namespace holding repositories
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Storage {
    pub id: String,
    repositories: BTreeMap<String, Repository>,
}

impl Storage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            repositories: BTreeMap::new(),
        }
    }

    /// Add (or replace) a repository; the storage back-reference is rewritten
    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.add_repository(repository);
        self
    }

    pub fn add_repository(&mut self, mut repository: Repository) -> Option<Repository> {
        repository.storage_id = self.id.clone();
        self.repositories.insert(repository.id.clone(), repository)
    }

    pub fn remove_repository(&mut self, repository_id: &str) -> Option<Repository> {
        self.repositories.remove(repository_id)
    }

    pub fn get_repository(&self, repository_id: &str) -> Option<&Repository> {
        self.repositories.get(repository_id)
    }

    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.values()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
