//! Error types for depot-storage

use std::fmt;
use thiserror::Error;

/// Storage error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Filesystem errors while reading repository paths
    Io,
    /// Serialization/deserialization errors (YAML, JSON)
    Serialization,
    /// Invalid repository configuration (unknown members, cycles, ...)
    Config,
    /// Storage not found
    StorageNotFound,
    /// Repository not found
    RepositoryNotFound,
    /// Optimistic concurrency conflict on an artifact entry
    Conflict,
    /// Database errors (SQLite)
    Database,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Config => "config",
            ErrorKind::StorageNotFound => "storage_not_found",
            ErrorKind::RepositoryNotFound => "repository_not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Database => "database",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct StorageError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn storage_not_found(storage_id: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::StorageNotFound,
            format!("Storage not found: {}", storage_id.into()),
        )
    }

    pub fn repository_not_found(storage_id: &str, repository_id: &str) -> Self {
        Self::new(
            ErrorKind::RepositoryNotFound,
            format!("Repository not found: {}:{}", storage_id, repository_id),
        )
    }

    pub fn conflict(path: impl Into<String>, expected_version: u64) -> Self {
        Self::new(
            ErrorKind::Conflict,
            format!(
                "Artifact entry {} was modified concurrently (expected version {})",
                path.into(),
                expected_version
            ),
        )
    }

    /// Whether the error is an optimistic concurrency conflict (retryable)
    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }

    /// Whether the error refers to a missing storage or repository
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::StorageNotFound | ErrorKind::RepositoryNotFound
        )
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::io(format!("I/O error: {}", err)).with_source(err)
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::database(format!("SQLite error: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<serde_yaml::Error> for StorageError {
    fn from(err: serde_yaml::Error) -> Self {
        StorageError::serialization(format!("YAML error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StorageError>;
