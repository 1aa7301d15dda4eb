//! Checksum-comparison and unconditional-refresh strategies

use crate::errors::Result;
use crate::features::metadata_expiration::domain::{normalize_checksum, ChecksumAlgorithm, Decision};
use crate::features::metadata_expiration::ports::MetadataExpirationStrategy;
use crate::features::proxy::ports::RemoteResolver;
use async_trait::async_trait;
use depot_storage::{ConfigurationManager, Repository, RepositoryFiles, RepositoryPath};
use std::sync::Arc;
use tracing::{debug, warn};

/// Compares the local checksum sidecar with a freshly fetched one
///
/// SHA1 first; when SHA1 cannot decide, the same comparison runs on MD5.
pub struct ChecksumMetadataExpirationStrategy {
    configuration: Arc<ConfigurationManager>,
    files: Arc<dyn RepositoryFiles>,
    resolver: Arc<dyn RemoteResolver>,
}

impl ChecksumMetadataExpirationStrategy {
    pub fn new(
        configuration: Arc<ConfigurationManager>,
        files: Arc<dyn RepositoryFiles>,
        resolver: Arc<dyn RemoteResolver>,
    ) -> Self {
        Self {
            configuration,
            files,
            resolver,
        }
    }

    async fn decide_with(
        &self,
        repository: &Repository,
        path: &RepositoryPath,
        algorithm: ChecksumAlgorithm,
    ) -> Result<Decision> {
        let sidecar = path.sidecar(algorithm.extension());

        // baseline must be read before the fetch overwrites the sidecar
        let local = match self.files.read_to_string(&sidecar)?.as_deref().and_then(normalize_checksum) {
            Some(local) => local,
            None => {
                debug!(path = %sidecar, "No local checksum baseline");
                return Ok(Decision::Undecided);
            }
        };

        match self.resolver.fetch_remote_resource(repository, &sidecar).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %sidecar, "Remote checksum not available");
                return Ok(Decision::Undecided);
            }
            Err(err) => {
                warn!(path = %sidecar, error = %err, "Remote checksum fetch failed");
                return Ok(Decision::Undecided);
            }
        }

        let remote = match self.files.read_to_string(&sidecar)?.as_deref().and_then(normalize_checksum) {
            Some(remote) => remote,
            None => return Ok(Decision::Undecided),
        };

        Ok(if local == remote {
            Decision::Usable
        } else {
            Decision::Expired
        })
    }
}

#[async_trait]
impl MetadataExpirationStrategy for ChecksumMetadataExpirationStrategy {
    async fn decide(&self, path: &RepositoryPath) -> Result<Decision> {
        let configuration = self.configuration.snapshot();
        let repository = configuration.repository(path.storage_id(), path.repository_id())?;

        for algorithm in ChecksumAlgorithm::FALLBACK_ORDER {
            let decision = self.decide_with(repository, path, algorithm).await?;
            if decision != Decision::Undecided {
                debug!(path = %path, algorithm = algorithm.extension(), ?decision, "Metadata expiration decided");
                return Ok(decision);
            }
        }
        Ok(Decision::Undecided)
    }
}

/// Always re-fetch
#[derive(Debug, Default, Clone, Copy)]
pub struct RefreshMetadataExpirationStrategy;

#[async_trait]
impl MetadataExpirationStrategy for RefreshMetadataExpirationStrategy {
    async fn decide(&self, _path: &RepositoryPath) -> Result<Decision> {
        Ok(Decision::Expired)
    }
}
