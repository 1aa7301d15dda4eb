//! Per-path async write locks

use dashmap::DashMap;
use depot_storage::RepositoryPath;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per `storage:repository:relative` key
///
/// Entries are created on demand and dropped by [`release`](Self::release)
/// once nobody holds or waits on them.
#[derive(Debug, Default)]
pub struct PathLockManager {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PathLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, path: &RepositoryPath) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(path.lock_key())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock entry for `path` if it is idle
    pub fn release(&self, path: &RepositoryPath) {
        self.locks
            .remove_if(&path.lock_key(), |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
