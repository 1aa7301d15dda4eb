//! Group resolution infrastructure

mod group_path_index;
mod routing_rules;

pub use group_path_index::GroupPathIndex;
pub use routing_rules::{ConfiguredRoutingRulesChecker, RoutingRulesCache};
