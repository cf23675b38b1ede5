//! Naming rule-set: character classes per target type, extension limits,
//! reserved names.

use crate::document::{
    PatternRule, SpecDocument, VectorDoc, ensure_format_version, ensure_unique_rule_names,
    normalize_token_list,
};
use crate::error::SpecError;
use crate::vocabulary::{RuleCategory, TargetType};
use serde::{Deserialize, Serialize};

const CATEGORY: RuleCategory = RuleCategory::Naming;

fn default_max_length() -> usize {
    128
}

fn default_max_extensions() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NamingSettings {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Values longer than this only warn.
    #[serde(default)]
    pub recommended_length: Option<usize>,
    #[serde(default = "default_max_extensions")]
    pub max_extensions: usize,
    /// File-name prefixes that are exempt from extension counting and the
    /// reserved-stem check (`root.` by default in the shipped rule set).
    #[serde(default)]
    pub multi_segment_prefixes: Vec<String>,
    #[serde(default)]
    pub reserved_names: Vec<String>,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            recommended_length: None,
            max_extensions: default_max_extensions(),
            multi_segment_prefixes: Vec::new(),
            reserved_names: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NamingSpec {
    pub format_version: String,
    pub settings: NamingSettings,
    pub rules: Vec<PatternRule>,
    pub vectors: Vec<VectorDoc>,
}

impl NamingSpec {
    pub fn from_document(doc: SpecDocument<NamingSettings>) -> Result<Self, SpecError> {
        ensure_format_version(CATEGORY, &doc.format_version)?;
        ensure_unique_rule_names(CATEGORY, &doc.rules)?;

        let mut settings = doc.settings;
        if settings.max_length == 0 {
            return Err(SpecError::invalid(CATEGORY, "max_length must be positive"));
        }
        if let Some(recommended) = settings.recommended_length {
            if recommended > settings.max_length {
                return Err(SpecError::invalid(
                    CATEGORY,
                    format!(
                        "recommended_length {recommended} exceeds max_length {}",
                        settings.max_length
                    ),
                ));
            }
        }
        settings.reserved_names = normalize_token_list(&settings.reserved_names);
        settings.multi_segment_prefixes = settings
            .multi_segment_prefixes
            .iter()
            .map(|prefix| prefix.trim().to_string())
            .filter(|prefix| !prefix.is_empty())
            .collect();

        let mut rules = Vec::with_capacity(doc.rules.len());
        for rule_doc in &doc.rules {
            if rule_doc.applies_to.is_empty() {
                return Err(SpecError::invalid(
                    CATEGORY,
                    format!("rule `{}` must declare applies_to", rule_doc.name.trim()),
                ));
            }
            rules.push(PatternRule::compile(CATEGORY, rule_doc)?);
        }

        for target_type in TargetType::ALL {
            if !rules.iter().any(|rule| rule.applies_to.contains(&target_type)) {
                return Err(SpecError::invalid(
                    CATEGORY,
                    format!("no rule applies to target type `{target_type}`"),
                ));
            }
        }

        Ok(Self {
            format_version: doc.format_version.trim().to_string(),
            settings,
            rules,
            vectors: doc.vectors,
        })
    }

    pub fn rules_for(&self, target_type: TargetType) -> impl Iterator<Item = &PatternRule> {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to.contains(&target_type))
    }

    pub fn rule(&self, name: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Case-insensitive reserved-name membership.
    pub fn is_reserved(&self, value: &str) -> bool {
        let lowered = value.to_ascii_lowercase();
        self.settings
            .reserved_names
            .binary_search(&lowered)
            .is_ok()
    }

    /// The exempt multi-segment prefix `name` starts with, if any.
    pub fn exempt_prefix(&self, name: &str) -> Option<&str> {
        self.settings
            .multi_segment_prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| name.len() > prefix.len() && name.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> SpecDocument<NamingSettings> {
        toml::from_str(text).expect("document should parse")
    }

    const MINIMAL: &str = r#"
category = "naming"
format_version = "1.0.0"

[settings]
reserved_names = ["System", "root"]
multi_segment_prefixes = ["root."]

[[rules]]
name = "any"
applies_to = ["file", "directory", "identifier", "version", "urn_fragment"]
pattern = '^.+$'
"#;

    #[test]
    fn reserved_names_match_case_insensitively() {
        let spec = NamingSpec::from_document(doc(MINIMAL)).expect("spec");
        assert!(spec.is_reserved("system"));
        assert!(spec.is_reserved("ROOT"));
        assert!(!spec.is_reserved("core"));
    }

    #[test]
    fn exempt_prefix_requires_a_remainder() {
        let spec = NamingSpec::from_document(doc(MINIMAL)).expect("spec");
        assert_eq!(spec.exempt_prefix("root.config.yaml"), Some("root."));
        assert_eq!(spec.exempt_prefix("root."), None);
        assert_eq!(spec.exempt_prefix("rootconfig"), None);
    }

    #[test]
    fn every_target_type_needs_a_rule() {
        let text = r#"
category = "naming"
format_version = "1.0.0"

[[rules]]
name = "files"
applies_to = ["file"]
pattern = '^.+$'
"#;
        let err = NamingSpec::from_document(doc(text)).expect_err("incomplete");
        assert!(err.to_string().contains("no rule applies to target type"));
    }

    #[test]
    fn recommended_length_cannot_exceed_max() {
        let text = MINIMAL.replace(
            "[settings]",
            "[settings]\nmax_length = 10\nrecommended_length = 20",
        );
        let err = NamingSpec::from_document(doc(&text)).expect_err("inconsistent lengths");
        assert!(err.to_string().contains("recommended_length"));
    }
}
