//! Group repository resolution
//!
//! # Architecture (Hexagonal)
//!
//! ```text
//! ArtifactEventDispatcher / CLI
//!           ↓
//! application/ (collector, existence checker, propagator)
//!           ↓
//! domain/ (ExistenceMemo, UpdateOutcome)
//!           ↓
//! ports/ (RoutingRulesChecker, RoutingRulesSource, UpdateCallback, GroupCleanupHook)
//!           ↑
//! infrastructure/ (ConfiguredRoutingRulesChecker, RoutingRulesCache, GroupPathIndex)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let existence = Arc::new(GroupArtifactExistenceChecker::new(config.clone(), files, layouts.clone()));
//! let found = existence.artifact_exists_in_group_subtree(&group, "org/a/1.0/a-1.0.jar")?;
//!
//! let routing = Arc::new(RoutingRulesCache::new());
//! let propagator = GroupRepositoryPropagator::new(config, routing, existence, layouts);
//! propagator.update_groups_containing(&path, &index_updater)?;
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{
    GroupArtifactExistenceChecker, GroupRepositoryPropagator, GroupRepositorySetCollector,
};
pub use domain::{ExistenceMemo, MemoState, UpdateOutcome};
pub use infrastructure::{ConfiguredRoutingRulesChecker, GroupPathIndex, RoutingRulesCache};
pub use ports::{GroupCleanupHook, RoutingRulesChecker, RoutingRulesSource, UpdateCallback};
