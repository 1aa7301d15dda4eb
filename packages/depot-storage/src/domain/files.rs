//! Port: byte-level access to repository paths

use super::path::RepositoryPath;
use std::io;

/// Raw repository file access
///
/// # Implementations
///
/// - `FsRepositoryFiles`: `<root>/<storage>/<repository>/<relative>` on disk
/// - `InMemoryRepositoryFiles`: DashMap-backed, for tests and ephemeral use
pub trait RepositoryFiles: Send + Sync {
    fn exists(&self, path: &RepositoryPath) -> io::Result<bool>;

    /// File content, `None` when the file does not exist
    fn read_to_string(&self, path: &RepositoryPath) -> io::Result<Option<String>>;

    /// File size in bytes, `None` when the file does not exist
    fn size(&self, path: &RepositoryPath) -> io::Result<Option<u64>>;

    fn write(&self, path: &RepositoryPath, bytes: &[u8]) -> io::Result<()>;

    /// Returns whether something was deleted
    fn delete(&self, path: &RepositoryPath) -> io::Result<bool>;
}
