//! Group resolution ports
//!
//! - `RoutingRulesChecker`: may an artifact path flow from a member into a group
//! - `RoutingRulesSource`: the checker matching a configuration snapshot
//! - `UpdateCallback`: work performed at each parent group after an upload
//! - `GroupCleanupHook`: work performed at a group once an artifact is gone
//!   from its whole subtree

mod callbacks;
mod routing;

pub use callbacks::{GroupCleanupHook, UpdateCallback};
pub use routing::{RoutingRulesChecker, RoutingRulesSource};
