use crate::errors::Result;
use async_trait::async_trait;
use depot_storage::{Repository, RepositoryPath};

/// Transport to remote origins
///
/// # Implementations
///
/// - `HttpRemoteResolver`: reqwest client (HEAD probes, GET fetch-through)
#[async_trait]
pub trait RemoteResolver: Send + Sync {
    /// Probe `url`; `Ok(true)` when the remote answered successfully
    async fn path_exists(&self, url: &str) -> Result<bool>;

    /// Fetch `path` from `repository`'s remote into local storage
    ///
    /// `Ok(false)` when the remote does not have the resource.
    async fn fetch_remote_resource(&self, repository: &Repository, path: &RepositoryPath) -> Result<bool>;
}
