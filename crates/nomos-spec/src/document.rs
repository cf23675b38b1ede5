//! Raw specification documents as authored on disk.
//!
//! A document is one TOML file per rule category:
//!
//! ```toml
//! category = "naming"
//! format_version = "1.0.0"
//!
//! [settings]
//! max_extensions = 1
//!
//! [[rules]]
//! name = "identifier"
//! applies_to = ["identifier"]
//! pattern = '^[a-z][a-z0-9]*(-[a-z0-9]+)*$'
//! description = "identifiers start with a letter"
//! examples = { pass = ["core"], fail = ["2core"] }
//!
//! [[vectors]]
//! value = "root.config.yaml"
//! target_type = "file"
//! expect = "pass"
//! ```

use crate::error::SpecError;
use crate::vocabulary::{PathOperation, RuleCategory, TargetType, WritePolicy};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpecDocument<S> {
    pub category: RuleCategory,
    pub format_version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: S,
    #[serde(default)]
    pub rules: Vec<RuleDoc>,
    #[serde(default)]
    pub vectors: Vec<VectorDoc>,
}

/// One named rule: `name / pattern / description / examples`.
///
/// `applies_to` is used by naming rules, `order` and `policy` by path rules.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleDoc {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: RuleExamples,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applies_to: Vec<TargetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<WritePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleExamples {
    #[serde(default)]
    pub pass: Vec<String>,
    #[serde(default)]
    pub fail: Vec<String>,
}

impl RuleExamples {
    pub fn len(&self) -> usize {
        self.pass.len() + self.fail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pass.is_empty() && self.fail.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Pass,
    Fail,
}

/// A whole-validator expectation authored next to the rules.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct VectorDoc {
    pub value: String,
    pub expect: Expectation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<PathOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<WritePolicy>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// A rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: String,
    pub description: String,
    pub pattern: Regex,
    pub applies_to: Vec<TargetType>,
    pub examples: RuleExamples,
}

impl PatternRule {
    pub(crate) fn compile(category: RuleCategory, doc: &RuleDoc) -> Result<Self, SpecError> {
        let name = doc.name.trim();
        if name.is_empty() {
            return Err(SpecError::invalid(category, "rule with empty name"));
        }
        let pattern = Regex::new(&doc.pattern).map_err(|source| SpecError::InvalidPattern {
            category,
            rule: name.to_string(),
            pattern: doc.pattern.clone(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            description: doc.description.trim().to_string(),
            pattern,
            applies_to: doc.applies_to.clone(),
            examples: doc.examples.clone(),
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    /// Human-facing explanation used in diagnostics.
    pub fn explain(&self) -> String {
        if self.description.is_empty() {
            format!("must match {}", self.pattern.as_str())
        } else {
            self.description.clone()
        }
    }
}

pub(crate) fn ensure_unique_rule_names(
    category: RuleCategory,
    rules: &[RuleDoc],
) -> Result<(), SpecError> {
    let mut seen = std::collections::BTreeSet::new();
    for rule in rules {
        if !seen.insert(rule.name.trim()) {
            return Err(SpecError::invalid(
                category,
                format!("duplicate rule name `{}`", rule.name.trim()),
            ));
        }
    }
    Ok(())
}

pub(crate) fn ensure_format_version(category: RuleCategory, version: &str) -> Result<(), SpecError> {
    let parts: Vec<&str> = version.trim().split('.').collect();
    let numeric = parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if numeric {
        Ok(())
    } else {
        Err(SpecError::invalid(
            category,
            format!("format_version {version:?} must be MAJOR.MINOR.PATCH"),
        ))
    }
}

pub(crate) fn normalize_token_list(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_doc_parses_inline_examples() {
        let doc: RuleDoc = toml::from_str(
            r#"
name = "identifier"
applies_to = ["identifier"]
pattern = '^[a-z]+$'
description = "letters only"
examples = { pass = ["core"], fail = ["Core", "1"] }
"#,
        )
        .expect("rule should parse");
        assert_eq!(doc.applies_to, vec![TargetType::Identifier]);
        assert_eq!(doc.examples.len(), 3);
        assert!(doc.order.is_none());
    }

    #[test]
    fn compile_rejects_bad_regex() {
        let doc = RuleDoc {
            name: "broken".to_string(),
            pattern: "([a-z".to_string(),
            description: String::new(),
            examples: RuleExamples::default(),
            applies_to: vec![],
            order: None,
            policy: None,
        };
        let err = PatternRule::compile(RuleCategory::Naming, &doc).expect_err("bad regex");
        assert!(matches!(err, SpecError::InvalidPattern { .. }));
    }

    #[test]
    fn format_version_must_be_semver_triplet() {
        assert!(ensure_format_version(RuleCategory::Urn, "1.0.0").is_ok());
        assert!(ensure_format_version(RuleCategory::Urn, "v1.0.0").is_err());
        assert!(ensure_format_version(RuleCategory::Urn, "1.0").is_err());
    }

    #[test]
    fn token_lists_are_lowercased_and_deduplicated() {
        let tokens = normalize_token_list(&[
            "System".to_string(),
            " root ".to_string(),
            "system".to_string(),
            String::new(),
        ]);
        assert_eq!(tokens, vec!["root".to_string(), "system".to_string()]);
    }
}
