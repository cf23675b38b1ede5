//! Namespace rule-set: separator, depth bound, reserved tokens, root segment.

use crate::document::{
    PatternRule, SpecDocument, VectorDoc, ensure_format_version, ensure_unique_rule_names,
    normalize_token_list,
};
use crate::error::SpecError;
use crate::vocabulary::RuleCategory;
use serde::{Deserialize, Serialize};

const CATEGORY: RuleCategory = RuleCategory::Namespace;

/// Name of the rule every namespace's first segment must satisfy.
pub const ROOT_SEGMENT_RULE: &str = "root-segment";

fn default_separator() -> char {
    '.'
}

fn default_max_depth() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceSettings {
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Accepted with a warning; never mixed with the canonical separator.
    #[serde(default)]
    pub alternate_separators: Vec<char>,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub reserved: Vec<String>,
}

impl Default for NamespaceSettings {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            alternate_separators: Vec::new(),
            max_depth: default_max_depth(),
            reserved: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NamespaceSpec {
    pub format_version: String,
    pub settings: NamespaceSettings,
    pub root_rule: PatternRule,
    /// Additional whole-namespace rules, applied after segment checks.
    pub rules: Vec<PatternRule>,
    pub vectors: Vec<VectorDoc>,
}

impl NamespaceSpec {
    pub fn from_document(doc: SpecDocument<NamespaceSettings>) -> Result<Self, SpecError> {
        ensure_format_version(CATEGORY, &doc.format_version)?;
        ensure_unique_rule_names(CATEGORY, &doc.rules)?;

        let mut settings = doc.settings;
        if settings.max_depth == 0 {
            return Err(SpecError::invalid(CATEGORY, "max_depth must be positive"));
        }
        for sep in std::iter::once(&settings.separator).chain(&settings.alternate_separators) {
            if sep.is_ascii_alphanumeric() || *sep == '-' || sep.is_whitespace() {
                return Err(SpecError::invalid(
                    CATEGORY,
                    format!("separator {sep:?} collides with segment characters"),
                ));
            }
        }
        if settings.alternate_separators.contains(&settings.separator) {
            return Err(SpecError::invalid(
                CATEGORY,
                "alternate_separators must not repeat the canonical separator",
            ));
        }
        settings.reserved = normalize_token_list(&settings.reserved);

        let mut root_rule = None;
        let mut rules = Vec::new();
        for rule_doc in &doc.rules {
            let rule = PatternRule::compile(CATEGORY, rule_doc)?;
            if rule.name == ROOT_SEGMENT_RULE {
                root_rule = Some(rule);
            } else {
                rules.push(rule);
            }
        }
        let root_rule = root_rule.ok_or_else(|| {
            SpecError::invalid(CATEGORY, format!("missing `{ROOT_SEGMENT_RULE}` rule"))
        })?;

        Ok(Self {
            format_version: doc.format_version.trim().to_string(),
            settings,
            root_rule,
            rules,
            vectors: doc.vectors,
        })
    }

    pub fn is_reserved(&self, segment: &str) -> bool {
        let lowered = segment.to_ascii_lowercase();
        self.settings.reserved.binary_search(&lowered).is_ok()
    }

    pub fn all_rules(&self) -> impl Iterator<Item = &PatternRule> {
        std::iter::once(&self.root_rule).chain(self.rules.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<NamespaceSpec, SpecError> {
        let doc: SpecDocument<NamespaceSettings> = toml::from_str(text).expect("toml");
        NamespaceSpec::from_document(doc)
    }

    #[test]
    fn root_segment_rule_is_required() {
        let err = parse(
            r#"
category = "namespace"
format_version = "1.0.0"

[[rules]]
name = "something-else"
pattern = '^.+$'
"#,
        )
        .expect_err("missing root rule");
        assert!(err.to_string().contains("root-segment"));
    }

    #[test]
    fn separators_cannot_be_segment_characters() {
        let err = parse(
            r#"
category = "namespace"
format_version = "1.0.0"

[settings]
separator = "-"

[[rules]]
name = "root-segment"
pattern = '^[a-z]+$'
"#,
        )
        .expect_err("dash separator");
        assert!(err.to_string().contains("collides"));
    }

    #[test]
    fn defaults_apply_without_settings_table() {
        let spec = parse(
            r#"
category = "namespace"
format_version = "1.0.0"

[[rules]]
name = "root-segment"
pattern = '^[a-z]+$'
"#,
        )
        .expect("spec");
        assert_eq!(spec.settings.separator, '.');
        assert_eq!(spec.settings.max_depth, 5);
        assert!(spec.rules.is_empty());
    }
}
