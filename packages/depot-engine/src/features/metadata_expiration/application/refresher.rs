//! Proxy metadata refresh gate

use super::strategies::{ChecksumMetadataExpirationStrategy, RefreshMetadataExpirationStrategy};
use crate::errors::Result;
use crate::features::metadata_expiration::domain::{Decision, RefreshOutcome};
use crate::features::layout::LayoutRegistry;
use crate::features::metadata_expiration::ports::MetadataExpirationStrategy;
use crate::features::proxy::ports::RemoteResolver;
use depot_storage::{ConfigurationManager, RepositoryFiles, RepositoryPath};
use std::sync::Arc;
use tracing::{debug, info};

/// Re-fetches proxy metadata unless the expiration strategy says it is usable
///
/// Only paths the repository's layout reports as metadata expire. Proxies
/// with `checksum_policy` enabled use checksum comparison, the rest always
/// refresh.
pub struct ProxyMetadataRefresher {
    configuration: Arc<ConfigurationManager>,
    layouts: Arc<LayoutRegistry>,
    resolver: Arc<dyn RemoteResolver>,
    checksum: Arc<dyn MetadataExpirationStrategy>,
    refresh: Arc<dyn MetadataExpirationStrategy>,
}

impl ProxyMetadataRefresher {
    pub fn new(
        configuration: Arc<ConfigurationManager>,
        files: Arc<dyn RepositoryFiles>,
        layouts: Arc<LayoutRegistry>,
        resolver: Arc<dyn RemoteResolver>,
    ) -> Self {
        let checksum = Arc::new(ChecksumMetadataExpirationStrategy::new(
            configuration.clone(),
            files,
            resolver.clone(),
        ));
        Self::with_strategies(
            configuration,
            layouts,
            resolver,
            checksum,
            Arc::new(RefreshMetadataExpirationStrategy),
        )
    }

    pub fn with_strategies(
        configuration: Arc<ConfigurationManager>,
        layouts: Arc<LayoutRegistry>,
        resolver: Arc<dyn RemoteResolver>,
        checksum: Arc<dyn MetadataExpirationStrategy>,
        refresh: Arc<dyn MetadataExpirationStrategy>,
    ) -> Self {
        Self {
            configuration,
            layouts,
            resolver,
            checksum,
            refresh,
        }
    }

    pub async fn refresh_if_needed(&self, path: &RepositoryPath) -> Result<RefreshOutcome> {
        let configuration = self.configuration.snapshot();
        let repository = configuration.repository(path.storage_id(), path.repository_id())?;

        // only layout metadata expires
        if !self.layouts.for_repository(repository)?.is_metadata(path.relativize()) {
            debug!(path = %path, layout = %repository.layout, "Not layout metadata, serving cached copy");
            return Ok(RefreshOutcome {
                decision: Decision::Usable,
                fetched: false,
                refreshed: false,
            });
        }

        let checksum_policy = repository
            .remote
            .as_ref()
            .map(|remote| remote.checksum_policy)
            .unwrap_or(false);
        let strategy = if checksum_policy { &self.checksum } else { &self.refresh };

        let decision = strategy.decide(path).await?;
        if decision == Decision::Usable {
            debug!(path = %path, "Cached metadata is usable");
            return Ok(RefreshOutcome {
                decision,
                fetched: false,
                refreshed: false,
            });
        }

        let refreshed = self.resolver.fetch_remote_resource(repository, path).await?;
        info!(path = %path, ?decision, refreshed, "Refreshed proxy metadata");
        Ok(RefreshOutcome {
            decision,
            fetched: true,
            refreshed,
        })
    }
}
