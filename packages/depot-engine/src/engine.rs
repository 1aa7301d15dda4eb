//! Composition root
//!
//! Builds every engine component once over a shared configuration manager,
//! repository file access and layout registry.

use crate::config::EngineConfig;
use crate::errors::Result;
use crate::features::artifact_events::{
    ArtifactEntryHandler, ArtifactEventDispatcher, EventWorkerPool, PathLockManager,
};
use crate::features::group_resolution::{
    GroupArtifactExistenceChecker, GroupCleanupHook, GroupRepositoryPropagator,
    GroupRepositorySetCollector, RoutingRulesCache, UpdateCallback,
};
use crate::features::layout::LayoutRegistry;
use crate::features::metadata_expiration::ProxyMetadataRefresher;
use crate::features::proxy::{RemoteRepositoryStatusChecker, RemoteRepositoryStatusRegistry, RemoteResolver};
use depot_storage::{ArtifactEntryStore, ConfigurationManager, RepositoryFiles};
use std::sync::Arc;

pub struct DepotEngine {
    pub config: EngineConfig,
    pub configuration: Arc<ConfigurationManager>,
    pub files: Arc<dyn RepositoryFiles>,
    pub layouts: Arc<LayoutRegistry>,
    pub collector: GroupRepositorySetCollector,
    pub existence: Arc<GroupArtifactExistenceChecker>,
    pub propagator: Arc<GroupRepositoryPropagator>,
}

impl DepotEngine {
    /// Wire the graph components
    ///
    /// Routing patterns of the current snapshot are compiled here so a broken
    /// pattern fails construction. Later snapshots are compiled on first use.
    pub fn new(
        config: EngineConfig,
        configuration: Arc<ConfigurationManager>,
        files: Arc<dyn RepositoryFiles>,
    ) -> Result<Self> {
        config.validate()?;
        let layouts = Arc::new(LayoutRegistry::with_defaults());
        let routing = Arc::new(RoutingRulesCache::new());
        routing.compiled_for(&configuration.snapshot())?;

        let existence = Arc::new(GroupArtifactExistenceChecker::new(
            configuration.clone(),
            files.clone(),
            layouts.clone(),
        ));
        let propagator = Arc::new(GroupRepositoryPropagator::new(
            configuration.clone(),
            routing,
            existence.clone(),
            layouts.clone(),
        ));

        Ok(Self {
            collector: GroupRepositorySetCollector::new(configuration.clone()),
            config,
            configuration,
            files,
            layouts,
            existence,
            propagator,
        })
    }

    /// Status checker over a registry seeded with the configured proxies
    pub fn remote_status_checker(&self, resolver: Arc<dyn RemoteResolver>) -> RemoteRepositoryStatusChecker {
        let registry = Arc::new(RemoteRepositoryStatusRegistry::new());
        registry.register_configuration(&self.configuration.snapshot());
        RemoteRepositoryStatusChecker::new(registry, resolver, self.config.remote.clone())
    }

    pub fn metadata_refresher(&self, resolver: Arc<dyn RemoteResolver>) -> ProxyMetadataRefresher {
        ProxyMetadataRefresher::new(
            self.configuration.clone(),
            self.files.clone(),
            self.layouts.clone(),
            resolver,
        )
    }

    /// Start the event workers (requires a tokio runtime)
    pub fn start_event_workers(
        &self,
        store: Arc<dyn ArtifactEntryStore>,
        update_callback: Arc<dyn UpdateCallback>,
        cleanup_hook: Arc<dyn GroupCleanupHook>,
    ) -> EventWorkerPool {
        let entries = Arc::new(ArtifactEntryHandler::new(
            store,
            self.files.clone(),
            Arc::new(PathLockManager::new()),
            self.config.events.clone(),
        ));
        let dispatcher = Arc::new(ArtifactEventDispatcher::new(
            entries,
            self.propagator.clone(),
            update_callback,
            cleanup_hook,
        ));
        EventWorkerPool::start(dispatcher, &self.config.events)
    }
}
