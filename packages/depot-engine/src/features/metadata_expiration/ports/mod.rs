//! Metadata expiration port

use crate::errors::Result;
use crate::features::metadata_expiration::domain::Decision;
use async_trait::async_trait;
use depot_storage::RepositoryPath;

/// Decides whether cached proxy metadata at `path` may still be served
#[async_trait]
pub trait MetadataExpirationStrategy: Send + Sync {
    async fn decide(&self, path: &RepositoryPath) -> Result<Decision>;
}
