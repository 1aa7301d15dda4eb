//! Artifact events
//!
//! ```text
//! submit(event) → EventWorkerPool (bounded mpsc, N workers)
//!                       ↓
//!              ArtifactEventDispatcher
//!               ↙                  ↘
//! ArtifactEntryHandler         GroupRepositoryPropagator
//! (path lock, retry on         (update / cleanup walk,
//!  version conflict)            blocking pool)
//! ```

pub mod application;
pub mod domain;

pub use application::{ArtifactEntryHandler, ArtifactEventDispatcher, EventWorkerPool, PathLockManager};
pub use domain::ArtifactEvent;
