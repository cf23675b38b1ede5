//! Specification load errors. Every variant is fatal to a validation run.

use crate::vocabulary::RuleCategory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("specification document not found: {path}")]
    Missing { path: String },

    #[error("failed to read specification {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml in specification {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("specification {path} declares category `{found}`, expected `{expected}`")]
    CategoryMismatch {
        path: String,
        expected: RuleCategory,
        found: RuleCategory,
    },

    #[error("{category} rule `{rule}` has invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        category: RuleCategory,
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{category} specification: {message}")]
    Invalid {
        category: RuleCategory,
        message: String,
    },
}

impl SpecError {
    pub(crate) fn invalid(category: RuleCategory, message: impl Into<String>) -> Self {
        Self::Invalid {
            category,
            message: message.into(),
        }
    }
}
