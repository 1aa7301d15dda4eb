//! Test doubles for ports

use async_trait::async_trait;
use depot_engine::features::group_resolution::{GroupCleanupHook, UpdateCallback, UpdateOutcome};
use depot_engine::{EngineError, RemoteResolver, Result};
use depot_storage::infrastructure::InMemoryRepositoryFiles;
use depot_storage::{Repository, RepositoryFiles, RepositoryPath};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════
// Repository files
// ═══════════════════════════════════════════════════════════════════════════

/// In-memory files counting `exists` calls per repository
///
/// Repositories listed in `failing` answer `exists` with an I/O error.
#[derive(Default)]
pub struct CountingFiles {
    pub inner: InMemoryRepositoryFiles,
    exists_calls: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
}

impl CountingFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, storage_id: &str, repository_id: &str, relative: &str, content: &str) {
        self.inner
            .write(&RepositoryPath::new(storage_id, repository_id, relative), content.as_bytes())
            .unwrap();
    }

    pub fn fail_repository(&self, storage_id: &str, repository_id: &str) {
        self.failing
            .lock()
            .insert(format!("{}:{}", storage_id, repository_id));
    }

    /// `exists` calls against `storage:repository`
    pub fn exists_calls(&self, storage_id: &str, repository_id: &str) -> usize {
        self.exists_calls
            .lock()
            .get(&format!("{}:{}", storage_id, repository_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn reset_counts(&self) {
        self.exists_calls.lock().clear();
    }
}

impl RepositoryFiles for CountingFiles {
    fn exists(&self, path: &RepositoryPath) -> io::Result<bool> {
        let key = path.repository_key().to_string();
        *self.exists_calls.lock().entry(key.clone()).or_insert(0) += 1;
        if self.failing.lock().contains(&key) {
            return Err(io::Error::new(io::ErrorKind::Other, format!("disk failure in {}", key)));
        }
        self.inner.exists(path)
    }

    fn read_to_string(&self, path: &RepositoryPath) -> io::Result<Option<String>> {
        self.inner.read_to_string(path)
    }

    fn size(&self, path: &RepositoryPath) -> io::Result<Option<u64>> {
        self.inner.size(path)
    }

    fn write(&self, path: &RepositoryPath, bytes: &[u8]) -> io::Result<()> {
        self.inner.write(path, bytes)
    }

    fn delete(&self, path: &RepositoryPath) -> io::Result<bool> {
        self.inner.delete(path)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Group callbacks
// ═══════════════════════════════════════════════════════════════════════════

/// Records every group path it is called with, in call order
#[derive(Default)]
pub struct RecordingCallback {
    calls: Mutex<Vec<String>>,
    stop: bool,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopping() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            stop: true,
        }
    }

    /// Group ids called, in order
    pub fn groups(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|call| call.split(['/', ':']).nth(1).unwrap_or_default().to_string())
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl UpdateCallback for RecordingCallback {
    fn before_update(&self) -> Result<UpdateOutcome> {
        Ok(if self.stop {
            UpdateOutcome::Stop
        } else {
            UpdateOutcome::Proceed
        })
    }

    fn perform_update(&self, group_path: &RepositoryPath) -> Result<()> {
        self.calls.lock().push(group_path.to_string());
        Ok(())
    }
}

impl GroupCleanupHook for RecordingCallback {
    fn cleanup_group_when_artifact_path_no_longer_exists_in_sub_tree(
        &self,
        _group: &Repository,
        artifact_path: &RepositoryPath,
    ) -> Result<()> {
        self.calls.lock().push(artifact_path.to_string());
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Remote resolvers
// ═══════════════════════════════════════════════════════════════════════════

/// Probes fail `failures` times, then succeed
pub struct FlakyResolver {
    failures: u32,
    delay: Duration,
    pub probes: AtomicU32,
}

impl FlakyResolver {
    pub fn failing_times(failures: u32) -> Self {
        Self {
            failures,
            delay: Duration::ZERO,
            probes: AtomicU32::new(0),
        }
    }

    /// Every probe takes `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn always_failing() -> Self {
        Self::failing_times(u32::MAX)
    }

    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteResolver for FlakyResolver {
    async fn path_exists(&self, url: &str) -> Result<bool> {
        let probe = self.probes.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if probe < self.failures {
            Err(EngineError::remote(format!("{}: connection reset", url)))
        } else {
            Ok(true)
        }
    }

    async fn fetch_remote_resource(&self, _repository: &Repository, _path: &RepositoryPath) -> Result<bool> {
        Ok(false)
    }
}

/// Remote with fixed content by relative path; fetches overwrite local files
pub struct ScriptedRemote {
    files: Arc<InMemoryRepositoryFiles>,
    content: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl ScriptedRemote {
    pub fn new(files: Arc<InMemoryRepositoryFiles>, content: &[(&str, &str)]) -> Self {
        Self {
            files,
            content: content
                .iter()
                .map(|(path, body)| (path.to_string(), body.to_string()))
                .collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Relative paths fetched, in order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }
}

#[async_trait]
impl RemoteResolver for ScriptedRemote {
    async fn path_exists(&self, _url: &str) -> Result<bool> {
        Ok(true)
    }

    async fn fetch_remote_resource(&self, _repository: &Repository, path: &RepositoryPath) -> Result<bool> {
        self.fetched.lock().push(path.relativize().to_string());
        match self.content.get(path.relativize()) {
            Some(body) => {
                self.files.write(path, body.as_bytes())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
