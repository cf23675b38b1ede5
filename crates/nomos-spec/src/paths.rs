//! Path rule-set: an ordered, first-match-wins list of patterns mapping
//! repository-relative paths to write policies, plus declared root areas.

use crate::document::{
    PatternRule, SpecDocument, VectorDoc, ensure_format_version, ensure_unique_rule_names,
};
use crate::error::SpecError;
use crate::vocabulary::{RuleCategory, WritePolicy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const CATEGORY: RuleCategory = RuleCategory::Paths;

/// A top-level region whose policy must not be weakened by a nested rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RootArea {
    pub name: String,
    pub prefix: String,
    pub policy: WritePolicy,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl RootArea {
    /// Whether `path` (already normalized) lies at or below this area.
    pub fn contains(&self, path: &str) -> bool {
        path == self.prefix
            || (path.starts_with(&self.prefix)
                && path.as_bytes().get(self.prefix.len()) == Some(&b'/'))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathSettings {
    /// Applied with a warning when no rule matches.
    #[serde(default)]
    pub default_policy: Option<WritePolicy>,
    #[serde(default)]
    pub areas: Vec<RootArea>,
}

#[derive(Debug, Clone)]
pub struct PathRule {
    pub order: u32,
    pub policy: WritePolicy,
    pub rule: PatternRule,
}

#[derive(Debug, Clone)]
pub struct PathSpec {
    pub format_version: String,
    pub default_policy: Option<WritePolicy>,
    pub areas: Vec<RootArea>,
    /// Sorted by `order`, ascending.
    pub rules: Vec<PathRule>,
    pub vectors: Vec<VectorDoc>,
}

impl PathSpec {
    pub fn from_document(doc: SpecDocument<PathSettings>) -> Result<Self, SpecError> {
        ensure_format_version(CATEGORY, &doc.format_version)?;
        ensure_unique_rule_names(CATEGORY, &doc.rules)?;

        let mut by_order: BTreeMap<u32, PathRule> = BTreeMap::new();
        for rule_doc in &doc.rules {
            let name = rule_doc.name.trim();
            let order = rule_doc.order.ok_or_else(|| {
                SpecError::invalid(CATEGORY, format!("rule `{name}` is missing `order`"))
            })?;
            let policy = rule_doc.policy.ok_or_else(|| {
                SpecError::invalid(CATEGORY, format!("rule `{name}` is missing `policy`"))
            })?;
            let rule = PatternRule::compile(CATEGORY, rule_doc)?;
            if let Some(existing) = by_order.get(&order) {
                return Err(SpecError::invalid(
                    CATEGORY,
                    format!(
                        "rules `{}` and `{name}` share order {order}",
                        existing.rule.name
                    ),
                ));
            }
            by_order.insert(order, PathRule { order, policy, rule });
        }

        let mut names = BTreeSet::new();
        let mut areas = Vec::with_capacity(doc.settings.areas.len());
        for area in doc.settings.areas {
            let prefix = area.prefix.trim().trim_matches('/').to_string();
            if prefix.is_empty() {
                return Err(SpecError::invalid(
                    CATEGORY,
                    format!("area `{}` has an empty prefix", area.name),
                ));
            }
            if !names.insert(area.name.clone()) {
                return Err(SpecError::invalid(
                    CATEGORY,
                    format!("area `{}` declared twice", area.name),
                ));
            }
            areas.push(RootArea { prefix, ..area });
        }
        // Deepest prefix first so `area_for` finds the most specific area.
        areas.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()).then(a.name.cmp(&b.name)));

        Ok(Self {
            format_version: doc.format_version.trim().to_string(),
            default_policy: doc.settings.default_policy,
            areas,
            rules: by_order.into_values().collect(),
            vectors: doc.vectors,
        })
    }

    /// First rule (by `order`) whose pattern matches the normalized path.
    pub fn first_match(&self, path: &str) -> Option<&PathRule> {
        self.rules.iter().find(|rule| rule.rule.is_match(path))
    }

    /// Most specific root area containing the normalized path.
    pub fn area_for(&self, path: &str) -> Option<&RootArea> {
        self.areas.iter().find(|area| area.contains(path))
    }
}
