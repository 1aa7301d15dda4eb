//! Artifact event handling

mod dispatcher;
mod entry_handler;
mod path_locks;
mod worker_pool;

pub use dispatcher::ArtifactEventDispatcher;
pub use entry_handler::ArtifactEntryHandler;
pub use path_locks::PathLockManager;
pub use worker_pool::EventWorkerPool;
