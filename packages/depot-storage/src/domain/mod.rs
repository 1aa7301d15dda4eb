//! Domain layer for depot storage
//!
//! # Domain Models
//!
//! - `Storage`: top-level namespace holding repositories
//! - `Repository`: hosted / proxy / group artifact container
//! - `RepositoryPath`: location inside one repository
//! - `RoutingRule`: per-edge accept/deny pattern between a group and members
//! - `ArtifactEntry`: metadata derived from an uploaded artifact
//!
//! # Port Traits
//!
//! - `RepositoryFiles`: raw byte access to repository paths
//! - `ArtifactEntryStore`: artifact entry persistence (optimistic concurrency)
//!
//! # Configuration
//!
//! - `Configuration`: validated storages → repositories graph (YAML v1)
//! - `ConfigurationManager`: copy-on-write snapshot holder

mod artifact_entry;
mod configuration;
mod configuration_manager;
mod files;
mod path;
mod repository;
mod routing;

pub use artifact_entry::{ArtifactEntry, ArtifactEntryStore};
pub use configuration::{Configuration, SUPPORTED_VERSIONS};
pub use configuration_manager::ConfigurationManager;
pub use files::RepositoryFiles;
pub use path::RepositoryPath;
pub use repository::{
    MemberRef, RemoteRepository, Repository, RepositoryKey, RepositoryType, Storage,
    DEFAULT_LAYOUT,
};
pub use routing::{RoutingRule, RoutingRuleType, ANY_GROUP};
