//! Ports - per-layout hooks consumed by the resolution engine

use depot_storage::{Repository, RepositoryFiles, RepositoryPath};
use std::io;

/// Checksum sidecar extensions, strongest first
pub const CHECKSUM_EXTENSIONS: &[&str] = &["sha1", "md5"];

/// Capability set a layout provider plugs into the engine
///
/// The engine is generic over layouts: path resolution and the
/// artifact-existence predicate are the only layout-specific steps of group
/// traversal.
pub trait LayoutHooks: Send + Sync {
    /// Registry name (`maven2`, `npm`, ...)
    fn name(&self) -> &str;

    /// Equivalent path of `relative` inside `repository`
    fn resolve(&self, repository: &Repository, relative: &str) -> RepositoryPath {
        RepositoryPath::of(repository, relative)
    }

    /// Layout-specific artifact existence predicate
    fn artifact_exists(
        &self,
        files: &dyn RepositoryFiles,
        path: &RepositoryPath,
    ) -> io::Result<bool> {
        files.exists(path)
    }

    /// Whether `relative` names layout metadata (version index, package document, ...)
    fn is_metadata(&self, relative: &str) -> bool;

    /// Whether `relative` names a checksum sidecar
    fn is_checksum(&self, relative: &str) -> bool {
        CHECKSUM_EXTENSIONS
            .iter()
            .any(|ext| relative.ends_with(&format!(".{}", ext)))
    }
}
