use super::Rule;
use crate::error::RuleLoadError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;

/// Either a bare JSON array of rules or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRuleSet {
    List(Vec<Rule>),
    Wrapped { rules: Vec<Rule> },
}

/// The rules delivered for one page, in authoring order.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_json(json: &str) -> Result<Self, RuleLoadError> {
        let raw: RawRuleSet = serde_json::from_str(json)?;
        let rules = match raw {
            RawRuleSet::List(rules) | RawRuleSet::Wrapped { rules } => rules,
        };
        let set = Self { rules };
        set.validate()?;
        Ok(set)
    }

    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Rejects duplicate non-empty rule ids.
    pub fn validate(&self) -> Result<(), RuleLoadError> {
        if let Some(duplicate) = self
            .rules
            .iter()
            .map(|r| r.id.as_str())
            .filter(|id| !id.is_empty())
            .duplicates()
            .next()
        {
            return Err(RuleLoadError::ValidationError {
                rule_id: duplicate.to_string(),
                message: "duplicate rule id".to_string(),
            });
        }
        Ok(())
    }

    pub fn active(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.is_active)
    }

    /// Active rules belonging to `site_id`.
    pub fn active_for_site<'a>(&'a self, site_id: &'a str) -> impl Iterator<Item = &'a Rule> {
        self.active().filter(move |r| r.site_id == site_id)
    }

    /// Every distinct action target of the active rules, in first-seen order.
    pub fn action_targets(&self) -> Vec<&str> {
        self.active()
            .flat_map(|r| r.actions.iter().map(|a| a.target_field_id.as_str()))
            .filter(|t| !t.trim().is_empty())
            .unique()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}
