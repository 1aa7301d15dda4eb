//! Regex-backed routing rules checker

use crate::errors::{EngineError, Result};
use crate::features::group_resolution::ports::{RoutingRulesChecker, RoutingRulesSource};
use depot_storage::{
    Configuration, Repository, RepositoryKey, RepositoryPath, RoutingRule, RoutingRuleType,
};
use parking_lot::RwLock;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

const ANY: &str = "*";

#[derive(Debug, Clone)]
struct CompiledRule {
    group_repository: String,
    pattern: Regex,
    rule_type: RoutingRuleType,
    repositories: Vec<String>,
}

impl CompiledRule {
    fn compile(rule: &RoutingRule) -> Result<Self> {
        let pattern = Regex::new(&rule.pattern).map_err(|source| EngineError::RoutingPattern {
            pattern: rule.pattern.clone(),
            source,
        })?;
        Ok(Self {
            group_repository: rule.group_repository.clone(),
            pattern,
            rule_type: rule.rule_type,
            repositories: rule.repositories.clone(),
        })
    }

    fn applies_to_group(&self, group: &Repository) -> bool {
        self.group_repository == ANY
            || self.group_repository == group.id
            || self.group_repository == group.key().to_string()
    }

    fn lists_member(&self, member: &RepositoryKey) -> bool {
        self.repositories.is_empty()
            || self.repositories.iter().any(|entry| {
                entry == ANY
                    || *entry == member.repository_id
                    || *entry == member.to_string()
            })
    }
}

/// Routing rules checker compiled from configured rules
///
/// Patterns are regular expressions searched in the layout-relative path
/// (anchor them with `^`/`$` for whole-path matches).
#[derive(Debug, Clone, Default)]
pub struct ConfiguredRoutingRulesChecker {
    rules: Vec<CompiledRule>,
}

impl ConfiguredRoutingRulesChecker {
    pub fn from_rules(rules: &[RoutingRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn from_configuration(configuration: &Configuration) -> Result<Self> {
        Self::from_rules(configuration.routing_rules())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RoutingRulesChecker for ConfiguredRoutingRulesChecker {
    fn is_denied(&self, group: &Repository, candidate: &RepositoryPath) -> bool {
        let member = candidate.repository_key();
        let path = candidate.relativize();

        let mut denied = false;
        let mut accepted = false;
        for rule in self
            .rules
            .iter()
            .filter(|rule| rule.applies_to_group(group) && rule.pattern.is_match(path))
        {
            let listed = rule.lists_member(&member);
            match rule.rule_type {
                RoutingRuleType::Deny if listed => denied = true,
                RoutingRuleType::Deny => {}
                RoutingRuleType::Accept if listed => accepted = true,
                RoutingRuleType::Accept => denied = true,
            }
        }

        let result = denied && !accepted;
        if result {
            debug!(group = %group.key(), member = %member, path, "Routing rules deny path");
        }
        result
    }
}

/// Compiled rules of the last configuration snapshot seen
///
/// A snapshot that is not pointer-equal to the cached one gets its rules
/// compiled on first use, so a `ConfigurationManager::replace` takes effect on
/// the next propagation without rebuilding the engine.
#[derive(Default)]
pub struct RoutingRulesCache {
    compiled: RwLock<Option<(Arc<Configuration>, Arc<ConfiguredRoutingRulesChecker>)>>,
}

impl RoutingRulesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled checker for `configuration`
    pub fn compiled_for(&self, configuration: &Arc<Configuration>) -> Result<Arc<ConfiguredRoutingRulesChecker>> {
        if let Some((cached, rules)) = self.compiled.read().as_ref() {
            if Arc::ptr_eq(cached, configuration) {
                return Ok(rules.clone());
            }
        }

        let rules = Arc::new(ConfiguredRoutingRulesChecker::from_configuration(configuration)?);
        info!(routing_rules = rules.len(), "Routing rules compiled");
        *self.compiled.write() = Some((configuration.clone(), rules.clone()));
        Ok(rules)
    }
}

impl RoutingRulesSource for RoutingRulesCache {
    fn rules_for(&self, configuration: &Arc<Configuration>) -> Result<Arc<dyn RoutingRulesChecker>> {
        let rules: Arc<dyn RoutingRulesChecker> = self.compiled_for(configuration)?;
        Ok(rules)
    }
}
