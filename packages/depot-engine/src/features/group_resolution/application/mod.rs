//! Group resolution use cases
//!
//! - `GroupRepositorySetCollector`: direct or flattened group membership
//! - `GroupArtifactExistenceChecker`: memoized depth-first subtree lookup
//! - `GroupRepositoryPropagator`: upward update / cleanup walks

mod existence_checker;
mod member_collector;
mod propagator;

pub use existence_checker::GroupArtifactExistenceChecker;
pub use member_collector::GroupRepositorySetCollector;
pub use propagator::GroupRepositoryPropagator;
