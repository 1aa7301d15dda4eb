/*
 * Depot Engine - group/proxy repository resolution
 *
 * Feature-First Hexagonal Architecture:
 * - config/    : Engine settings (YAML v1)
 * - features/  : Vertical slices (layout → group_resolution → proxy → metadata_expiration → artifact_events)
 * - engine     : Composition root wiring the slices over one configuration
 *
 * Repository graph model and storage adapters live in depot-storage.
 */

#![allow(clippy::new_without_default)] // Explicit constructors next to Default
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod engine;
pub mod errors;
pub mod features;

pub use config::{ArtifactEventConfig, ConfigError, EngineConfig, RemoteCheckConfig};
pub use engine::DepotEngine;
pub use errors::{EngineError, Result};

pub use features::artifact_events::{ArtifactEvent, ArtifactEventDispatcher, EventWorkerPool};
pub use features::group_resolution::{
    GroupArtifactExistenceChecker, GroupRepositoryPropagator, GroupRepositorySetCollector,
    RoutingRulesCache, RoutingRulesChecker, RoutingRulesSource, UpdateCallback, UpdateOutcome,
};
pub use features::layout::{LayoutHooks, LayoutRegistry};
pub use features::metadata_expiration::{Decision, MetadataExpirationStrategy};
pub use features::proxy::{
    RemoteRepositoryStatus, RemoteRepositoryStatusChecker, RemoteRepositoryStatusRegistry,
    RemoteResolver,
};
