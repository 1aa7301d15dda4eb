//! depot-storage - Repository graph model and storage adapters
//!
//! ## Core Principles
//!
//! 1. **Snapshot reads**: traversals run against an immutable
//!    `Arc<Configuration>`; admin changes swap whole snapshots
//! 2. **Back-references by id**: a repository names its storage, it does not
//!    own or borrow it
//! 3. **Validated at load**: unknown members and group cycles are rejected
//!    before a configuration is ever served
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depot_storage::{ConfigurationManager, RepositoryPath};
//!
//! let manager = ConfigurationManager::load("depot.yaml")?;
//! let config = manager.snapshot();
//!
//! let releases = config.repository("storage0", "releases")?;
//! let jar = RepositoryPath::of(releases, "org/example/a/1.0/a-1.0.jar");
//! let groups = config.group_repositories_containing("storage0", "releases");
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use domain::{
    ArtifactEntry, ArtifactEntryStore, Configuration, ConfigurationManager, MemberRef,
    RemoteRepository, Repository, RepositoryFiles, RepositoryKey, RepositoryPath, RepositoryType,
    RoutingRule, RoutingRuleType, Storage,
};
