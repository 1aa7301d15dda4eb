//! Routing rule definitions (data only; matching lives in the engine)

use serde::{Deserialize, Serialize};

/// Group selector matching every group repository
pub const ANY_GROUP: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingRuleType {
    /// Matching paths are served only by the listed members
    Accept,
    /// Matching paths never cross the edge to the listed members
    Deny,
}

/// Per-edge accept/deny rule between a group and its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingRule {
    /// `storage:group`, bare group id, or `*`
    #[serde(default = "any_group")]
    pub group_repository: String,
    /// Regular expression matched against the layout-relative path
    pub pattern: String,
    #[serde(rename = "type")]
    pub rule_type: RoutingRuleType,
    /// Members the rule applies to (`storage:repo` or bare id); empty = all
    #[serde(default)]
    pub repositories: Vec<String>,
}

fn any_group() -> String {
    ANY_GROUP.to_string()
}

impl RoutingRule {
    pub fn deny(group_repository: &str, pattern: &str, repositories: &[&str]) -> Self {
        Self::build(group_repository, pattern, RoutingRuleType::Deny, repositories)
    }

    pub fn accept(group_repository: &str, pattern: &str, repositories: &[&str]) -> Self {
        Self::build(group_repository, pattern, RoutingRuleType::Accept, repositories)
    }

    fn build(
        group_repository: &str,
        pattern: &str,
        rule_type: RoutingRuleType,
        repositories: &[&str],
    ) -> Self {
        Self {
            group_repository: group_repository.to_string(),
            pattern: pattern.to_string(),
            rule_type,
            repositories: repositories.iter().map(|r| r.to_string()).collect(),
        }
    }
}
