//! Error types for depot-engine
//!
//! Provides unified error handling across the engine features.

use crate::config::ConfigError;
use depot_storage::StorageError;
use thiserror::Error;

/// Main error type for engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Repository graph / storage errors (unknown members, I/O, conflicts)
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Engine settings errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid routing rule pattern
    #[error("Invalid routing rule pattern '{pattern}': {source}")]
    RoutingPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Remote transport error
    #[error("Remote error: {0}")]
    Remote(String),

    /// Layout not registered
    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    /// Event worker pool closed or worker gone
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl EngineError {
    pub fn remote(msg: impl Into<String>) -> Self {
        EngineError::Remote(msg.into())
    }

    pub fn worker_pool(msg: impl Into<String>) -> Self {
        EngineError::WorkerPool(msg.into())
    }

    /// Optimistic concurrency conflict from the artifact entry store
    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Storage(e) if e.is_conflict())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Remote(err.to_string())
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
