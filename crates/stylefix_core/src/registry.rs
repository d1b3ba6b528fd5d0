//! Flattening of rule sets into the ordered list the engine runs.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::rule::{Rule, RuleSet};

/// Builds the qualified id of a rule: `rule` for the standard set,
/// `set:rule` otherwise.
pub fn qualified_id(rule_set: &RuleSet, rule: &dyn Rule) -> String {
    if rule_set.is_standard() {
        rule.id().to_string()
    } else {
        format!("{}:{}", rule_set.id(), rule.id())
    }
}

/// Pairs every rule with its qualified id, in rule set order and then in
/// rule order within each set.
pub fn flatten(rule_sets: &[RuleSet]) -> Vec<(String, Arc<dyn Rule>)> {
    rule_sets
        .iter()
        .flat_map(|set| {
            set.rules()
                .iter()
                .map(move |rule| (qualified_id(set, rule.as_ref()), Arc::clone(rule)))
        })
        .collect()
}

/// Rules to run for one lint or format call.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<(String, Arc<dyn Rule>)>,
}

impl RuleRegistry {
    pub fn from_rule_sets(rule_sets: &[RuleSet]) -> Self {
        Self {
            rules: flatten(rule_sets),
        }
    }

    /// Flattens `rule_sets`, leaving out the rules `config` disables.
    pub fn from_rule_sets_with(rule_sets: &[RuleSet], config: &EngineConfig) -> Self {
        let mut registry = Self::from_rule_sets(rule_sets);
        if config.disabled_rules.is_empty() {
            return registry;
        }

        let registered = registry.ids();
        for id in &config.disabled_rules {
            if !registered.contains(&id.as_str()) {
                warn!("Disabled rule '{}' matches no registered rule", id);
            }
        }
        registry.rules.retain(|(id, _)| {
            let disabled = config.is_rule_disabled(id);
            if disabled {
                debug!("Rule '{}' is disabled", id);
            }
            !disabled
        });
        registry
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Rule)> {
        self.rules
            .iter()
            .map(|(id, rule)| (id.as_str(), rule.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Qualified ids, in execution order.
    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(|(id, _)| id.as_str()).collect()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
