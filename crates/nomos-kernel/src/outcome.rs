//! Diagnostics and per-check outcomes shared by every validator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable rule identifiers for checks that are not driven by a named
/// pattern rule. Pattern rules use `<category>.<rule name>`.
pub mod rule_id {
    pub const NAMING_EMPTY: &str = "naming.empty";
    pub const NAMING_LENGTH: &str = "naming.length";
    pub const NAMING_RESERVED: &str = "naming.reserved";
    pub const NAMING_EXTENSION: &str = "naming.extension";

    pub const NAMESPACE_PARSE: &str = "namespace.parse";
    pub const NAMESPACE_SEPARATOR: &str = "namespace.separator";
    pub const NAMESPACE_RESERVED: &str = "namespace.reserved";
    pub const NAMESPACE_DEPTH: &str = "namespace.depth";
    pub const NAMESPACE_REGISTRATION: &str = "namespace.registration";
    pub const NAMESPACE_DEPRECATED: &str = "namespace.deprecated";
    pub const NAMESPACE_PARENT: &str = "namespace.parent";
    pub const NAMESPACE_BOUNDARY: &str = "namespace.boundary";
    pub const NAMESPACE_UNIQUENESS: &str = "namespace.uniqueness";

    pub const URN_PARSE: &str = "urn.parse";
    pub const URN_RESOURCE_TYPE: &str = "urn.resource-type";
    pub const URN_REGISTRATION: &str = "urn.registration";
    pub const URN_DEPRECATED: &str = "urn.deprecated";
    pub const URN_UNIQUENESS: &str = "urn.uniqueness";

    pub const PATH_PARSE: &str = "path.parse";
    pub const PATH_DEFAULT_POLICY: &str = "path.default-policy";
    pub const PATH_ROOT_STRUCTURE: &str = "path.root-structure";
    pub const PATH_DECLARED_POLICY: &str = "path.declared-policy";
    pub const PATH_WRITE_POLICY: &str = "path.write-policy";

    pub const REFERENCE_LOCATION: &str = "reference.location";

    pub const INTERNAL: &str = "internal";
}

/// What kind of problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueClass {
    RuleViolation,
    Parse,
    Registration,
    DataIntegrity,
    PolicyViolation,
    Internal,
}

impl IssueClass {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueClass::RuleViolation => "rule_violation",
            IssueClass::Parse => "parse",
            IssueClass::Registration => "registration",
            IssueClass::DataIntegrity => "data_integrity",
            IssueClass::PolicyViolation => "policy_violation",
            IssueClass::Internal => "internal",
        }
    }
}

impl fmt::Display for IssueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: String,
    pub class: IssueClass,
    pub message: String,
}

impl Diagnostic {
    pub fn new(rule: impl Into<String>, class: IssueClass, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            class,
            message: message.into(),
        }
    }

    fn prefixed(self, prefix: &str) -> Self {
        Self {
            message: format!("{prefix}{}", self.message),
            ..self
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

/// `(ok, errors, warnings)` of one validator call. `ok` is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl CheckOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, rule: impl Into<String>, class: IssueClass, message: impl Into<String>) {
        self.errors.push(Diagnostic::new(rule, class, message));
    }

    pub fn warn(&mut self, rule: impl Into<String>, class: IssueClass, message: impl Into<String>) {
        self.warnings.push(Diagnostic::new(rule, class, message));
    }

    /// Fold a nested check's diagnostics in, prefixing each message.
    pub fn absorb(&mut self, prefix: &str, other: CheckOutcome) {
        self.errors
            .extend(other.errors.into_iter().map(|d| d.prefixed(prefix)));
        self.warnings
            .extend(other.warnings.into_iter().map(|d| d.prefixed(prefix)));
    }

    pub fn has_error(&self, rule: &str) -> bool {
        self.errors.iter().any(|d| d.rule == rule)
    }

    pub fn has_warning(&self, rule: &str) -> bool {
        self.warnings.iter().any(|d| d.rule == rule)
    }
}
