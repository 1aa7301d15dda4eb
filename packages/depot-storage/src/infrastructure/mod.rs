//! Infrastructure layer - Storage adapters
//!
//! - `fs`: on-disk repository files
//! - `memory`: DashMap-backed files and artifact entries
//! - `sqlite`: artifact entries in SQLite (feature `sqlite`)

pub mod fs;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use fs::FsRepositoryFiles;
pub use memory::{InMemoryArtifactEntryStore, InMemoryRepositoryFiles};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteArtifactEntryStore;
