//! URN rule-set: scheme, declared resource types, registration severity.

use crate::document::{
    PatternRule, SpecDocument, VectorDoc, ensure_format_version, ensure_unique_rule_names,
};
use crate::error::SpecError;
use crate::vocabulary::{ResourceType, RuleCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const CATEGORY: RuleCategory = RuleCategory::Urn;

/// Severity of a "not registered" URN diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    #[default]
    Error,
}

fn default_scheme() -> String {
    "urn".to_string()
}

fn default_resource_types() -> Vec<ResourceType> {
    ResourceType::ALL.to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UrnSettings {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_resource_types")]
    pub resource_types: Vec<ResourceType>,
    #[serde(default)]
    pub unregistered: Severity,
}

impl Default for UrnSettings {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            resource_types: default_resource_types(),
            unregistered: Severity::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UrnSpec {
    pub format_version: String,
    pub settings: UrnSettings,
    /// Whole-URN patterns checked after component validation.
    pub rules: Vec<PatternRule>,
    pub vectors: Vec<VectorDoc>,
}

impl UrnSpec {
    pub fn from_document(doc: SpecDocument<UrnSettings>) -> Result<Self, SpecError> {
        ensure_format_version(CATEGORY, &doc.format_version)?;
        ensure_unique_rule_names(CATEGORY, &doc.rules)?;

        let mut settings = doc.settings;
        settings.scheme = settings.scheme.trim().to_string();
        if settings.scheme.is_empty() || settings.scheme.contains(':') {
            return Err(SpecError::invalid(
                CATEGORY,
                format!("scheme {:?} must be non-empty and colon-free", settings.scheme),
            ));
        }
        if settings.resource_types.is_empty() {
            return Err(SpecError::invalid(
                CATEGORY,
                "resource_types must declare at least one type",
            ));
        }
        let mut seen = BTreeSet::new();
        for ty in &settings.resource_types {
            if !seen.insert(*ty) {
                return Err(SpecError::invalid(
                    CATEGORY,
                    format!("resource type `{ty}` declared twice"),
                ));
            }
        }

        let rules = doc
            .rules
            .iter()
            .map(|rule| PatternRule::compile(CATEGORY, rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            format_version: doc.format_version.trim().to_string(),
            settings,
            rules,
            vectors: doc.vectors,
        })
    }

    pub fn declares(&self, ty: ResourceType) -> bool {
        self.settings.resource_types.contains(&ty)
    }

    /// Declared resource types as a comma-separated list, for diagnostics.
    pub fn declared_list(&self) -> String {
        self.settings
            .resource_types
            .iter()
            .map(|ty| ty.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<UrnSpec, SpecError> {
        let doc: SpecDocument<UrnSettings> = toml::from_str(text).expect("toml");
        UrnSpec::from_document(doc)
    }

    #[test]
    fn defaults_declare_every_type_and_error_severity() {
        let spec = parse("category = \"urn\"\nformat_version = \"1.0.0\"\n").expect("spec");
        assert_eq!(spec.settings.scheme, "urn");
        assert_eq!(spec.settings.unregistered, Severity::Error);
        assert!(ResourceType::ALL.iter().all(|ty| spec.declares(*ty)));
    }

    #[test]
    fn subset_of_types_is_honored() {
        let spec = parse(
            r#"
category = "urn"
format_version = "1.0.0"

[settings]
resource_types = ["module", "service"]
unregistered = "warning"
"#,
        )
        .expect("spec");
        assert!(spec.declares(ResourceType::Module));
        assert!(!spec.declares(ResourceType::Agent));
        assert_eq!(spec.declared_list(), "module, service");
        assert_eq!(spec.settings.unregistered, Severity::Warning);
    }

    #[test]
    fn duplicate_types_are_rejected() {
        let err = parse(
            r#"
category = "urn"
format_version = "1.0.0"

[settings]
resource_types = ["module", "module"]
"#,
        )
        .expect_err("duplicate");
        assert!(err.to_string().contains("declared twice"));
    }
}
