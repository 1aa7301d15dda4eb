//! Filesystem adapter for `RepositoryFiles`
//!
//! Layout on disk: `<root>/<storage>/<repository>/<relative>`.

use crate::domain::{RepositoryFiles, RepositoryPath};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FsRepositoryFiles {
    root: PathBuf,
}

impl FsRepositoryFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Absolute location of a repository path
    ///
    /// # Errors
    ///
    /// `InvalidInput` for paths escaping the repository (`..` segments, or
    /// ids that are not a single directory name).
    pub fn fs_path(&self, path: &RepositoryPath) -> io::Result<PathBuf> {
        let single_component = |id: &str| {
            !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
        };
        if !single_component(path.storage_id()) || !single_component(path.repository_id()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Path escapes storage root: {}", path),
            ));
        }
        if path.relativize().split('/').any(|segment| segment == "..") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Path escapes repository: {}", path),
            ));
        }

        let mut fs_path = self.root.join(path.storage_id()).join(path.repository_id());
        if !path.is_root() {
            fs_path.push(path.relativize());
        }
        Ok(fs_path)
    }
}

impl RepositoryFiles for FsRepositoryFiles {
    fn exists(&self, path: &RepositoryPath) -> io::Result<bool> {
        self.fs_path(path)?.try_exists()
    }

    fn read_to_string(&self, path: &RepositoryPath) -> io::Result<Option<String>> {
        match fs::read_to_string(self.fs_path(path)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn size(&self, path: &RepositoryPath) -> io::Result<Option<u64>> {
        match fs::metadata(self.fs_path(path)?) {
            Ok(metadata) => Ok(Some(metadata.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &RepositoryPath, bytes: &[u8]) -> io::Result<()> {
        let fs_path = self.fs_path(path)?;
        if let Some(parent) = fs_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(fs_path, bytes)
    }

    fn delete(&self, path: &RepositoryPath) -> io::Result<bool> {
        match fs::remove_file(self.fs_path(path)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
