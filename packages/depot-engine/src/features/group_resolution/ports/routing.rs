use crate::errors::Result;
use depot_storage::{Configuration, Repository, RepositoryPath};
use std::sync::Arc;

/// Routing rule evaluation
pub trait RoutingRulesChecker: Send + Sync {
    /// Whether `candidate` (a path inside one member repository) is denied
    /// from being served or propagated through `group`
    fn is_denied(&self, group: &Repository, candidate: &RepositoryPath) -> bool;
}

/// Hands out the routing rules carried by one configuration snapshot
pub trait RoutingRulesSource: Send + Sync {
    fn rules_for(&self, configuration: &Arc<Configuration>) -> Result<Arc<dyn RoutingRulesChecker>>;
}
