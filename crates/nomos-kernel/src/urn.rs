//! URN parsing, validation, and resolution.
//!
//! `urn:<namespace>:<resource-type>:<identifier>[:<version>]`

use crate::context::ValidationContext;
use crate::namespace::{split_namespace, validate_namespace};
use crate::naming::validate_naming;
use crate::outcome::{CheckOutcome, Diagnostic, IssueClass, rule_id};
use nomos_registry::{EntryStatus, Lookup};
use nomos_spec::{ResourceType, Severity, TargetType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A syntactically well-formed URN. Components are kept verbatim so
/// `Display` reproduces the parsed text exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urn {
    pub scheme: String,
    pub namespace: String,
    pub resource_type: String,
    pub identifier: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrnParseError {
    #[error("expected 4 or 5 colon-separated components, found {found}")]
    Arity { found: usize },

    #[error("component {position} ({name}) is empty")]
    EmptyComponent { position: usize, name: &'static str },
}

const COMPONENT_NAMES: [&str; 5] = ["scheme", "namespace", "resource type", "identifier", "version"];

impl FromStr for Urn {
    type Err = UrnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if !(4..=5).contains(&parts.len()) {
            return Err(UrnParseError::Arity { found: parts.len() });
        }
        if let Some(index) = parts.iter().position(|part| part.is_empty()) {
            return Err(UrnParseError::EmptyComponent {
                position: index + 1,
                name: COMPONENT_NAMES[index],
            });
        }
        Ok(Urn {
            scheme: parts[0].to_string(),
            namespace: parts[1].to_string(),
            resource_type: parts[2].to_string(),
            identifier: parts[3].to_string(),
            version: parts.get(4).map(|v| v.to_string()),
        })
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.scheme, self.namespace, self.resource_type, self.identifier
        )?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

impl Urn {
    /// The registry key: this URN with its namespace written using the
    /// canonical separator. Unsplittable namespaces are kept verbatim.
    pub fn registry_key(&self, ctx: &ValidationContext<'_>) -> String {
        let mut scratch = CheckOutcome::new();
        match split_namespace(ctx, &self.namespace, &mut scratch) {
            Some(split) => Urn {
                namespace: split.canonical(ctx.spec.namespace.settings.separator),
                ..self.clone()
            }
            .to_string(),
            None => self.to_string(),
        }
    }
}

/// Parse `value` and check its scheme against the URN specification.
pub fn parse_urn(ctx: &ValidationContext<'_>, value: &str) -> Result<Urn, Diagnostic> {
    let urn: Urn = value.parse().map_err(|err: UrnParseError| {
        Diagnostic::new(rule_id::URN_PARSE, IssueClass::Parse, format!("`{value}`: {err}"))
    })?;
    let scheme = &ctx.spec.urn.settings.scheme;
    if &urn.scheme != scheme {
        return Err(Diagnostic::new(
            rule_id::URN_PARSE,
            IssueClass::Parse,
            format!("`{value}`: scheme must be `{scheme}`, found `{}`", urn.scheme),
        ));
    }
    Ok(urn)
}

/// Validate a URN; with `check_registration`, exactly one registry entry
/// must exist.
pub fn validate_urn(
    ctx: &ValidationContext<'_>,
    value: &str,
    check_registration: bool,
) -> CheckOutcome {
    let mut out = CheckOutcome::new();
    let urn = match parse_urn(ctx, value) {
        Ok(urn) => urn,
        Err(diagnostic) => {
            out.errors.push(diagnostic);
            return out;
        }
    };
    let spec = &ctx.spec.urn;

    out.absorb(
        "namespace: ",
        validate_namespace(ctx, &urn.namespace, check_registration),
    );

    match urn.resource_type.parse::<ResourceType>() {
        Ok(ty) if spec.declares(ty) => {}
        Ok(ty) => out.error(
            rule_id::URN_RESOURCE_TYPE,
            IssueClass::RuleViolation,
            format!(
                "resource type `{ty}` is not declared (declared: {})",
                spec.declared_list()
            ),
        ),
        Err(_) => out.error(
            rule_id::URN_RESOURCE_TYPE,
            IssueClass::RuleViolation,
            format!(
                "unknown resource type `{}` (declared: {})",
                urn.resource_type,
                spec.declared_list()
            ),
        ),
    }

    out.absorb(
        "identifier: ",
        validate_naming(ctx, &urn.identifier, TargetType::Identifier),
    );
    if let Some(version) = &urn.version {
        out.absorb(
            "version: ",
            validate_naming(ctx, version, TargetType::Version),
        );
    }

    for rule in &spec.rules {
        if !rule.is_match(value) {
            out.error(
                format!("urn.{}", rule.name),
                IssueClass::RuleViolation,
                format!("`{value}`: {}", rule.explain()),
            );
        }
    }

    if check_registration {
        check_urn_registration(ctx, &urn.registry_key(ctx), &mut out);
    }
    out
}

fn check_urn_registration(ctx: &ValidationContext<'_>, value: &str, out: &mut CheckOutcome) {
    match ctx.registry.urn(value) {
        Lookup::Missing => {
            let message = format!("urn `{value}` is not registered");
            match ctx.spec.urn.settings.unregistered {
                Severity::Error => {
                    out.error(rule_id::URN_REGISTRATION, IssueClass::Registration, message)
                }
                Severity::Warning => {
                    out.warn(rule_id::URN_REGISTRATION, IssueClass::Registration, message)
                }
            }
        }
        Lookup::Duplicate(entries) => {
            tracing::warn!(urn = %value, count = entries.len(), "duplicate urn entries");
            out.error(
                rule_id::URN_UNIQUENESS,
                IssueClass::DataIntegrity,
                format!("urn `{value}` has {} registry entries", entries.len()),
            );
        }
        Lookup::Unique(entry) => match entry.status {
            EntryStatus::Active => {}
            EntryStatus::Deprecated => out.warn(
                rule_id::URN_DEPRECATED,
                IssueClass::Registration,
                format!("urn `{value}` is deprecated"),
            ),
            EntryStatus::Reserved => out.error(
                rule_id::URN_REGISTRATION,
                IssueClass::Registration,
                format!("urn `{value}` is reserved and does not resolve"),
            ),
        },
    }
}

/// Where a resolved URN lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLocation {
    pub urn: String,
    pub location: String,
    pub owner: String,
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    Malformed,
    Invalid,
    Unregistered,
    Duplicate,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotFoundReason::Malformed => "malformed",
            NotFoundReason::Invalid => "invalid",
            NotFoundReason::Unregistered => "unregistered",
            NotFoundReason::Duplicate => "duplicate",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("cannot resolve `{urn}`: {reason}")]
pub struct NotFoundError {
    pub urn: String,
    pub reason: NotFoundReason,
    pub errors: Vec<Diagnostic>,
}

/// Resolve a URN to its registered storage location.
pub fn resolve_urn(
    ctx: &ValidationContext<'_>,
    value: &str,
) -> Result<ResourceLocation, NotFoundError> {
    let not_found = |reason, errors| NotFoundError {
        urn: value.to_string(),
        reason,
        errors,
    };

    let key = match parse_urn(ctx, value) {
        Ok(urn) => urn.registry_key(ctx),
        Err(diagnostic) => return Err(not_found(NotFoundReason::Malformed, vec![diagnostic])),
    };

    let outcome = validate_urn(ctx, value, true);
    let syntax: Vec<Diagnostic> = outcome
        .errors
        .iter()
        .filter(|d| !matches!(d.class, IssueClass::Registration | IssueClass::DataIntegrity))
        .cloned()
        .collect();
    if !syntax.is_empty() {
        return Err(not_found(NotFoundReason::Invalid, syntax));
    }

    let entry = match ctx.registry.urn(&key) {
        Lookup::Unique(entry) => entry,
        Lookup::Duplicate(_) => {
            return Err(not_found(NotFoundReason::Duplicate, outcome.errors));
        }
        Lookup::Missing => {
            let mut errors = outcome.errors;
            if !errors.iter().any(|d| d.rule == rule_id::URN_REGISTRATION) {
                errors.push(Diagnostic::new(
                    rule_id::URN_REGISTRATION,
                    IssueClass::Registration,
                    format!("urn `{key}` is not registered"),
                ));
            }
            return Err(not_found(NotFoundReason::Unregistered, errors));
        }
    };
    if entry.status == EntryStatus::Reserved {
        return Err(not_found(NotFoundReason::Unregistered, outcome.errors));
    }
    if !outcome.errors.is_empty() {
        return Err(not_found(NotFoundReason::Invalid, outcome.errors));
    }

    Ok(ResourceLocation {
        urn: entry.urn.clone(),
        location: entry.location.clone(),
        owner: entry.owner.clone(),
        status: entry.status,
        warnings: outcome.warnings,
    })
}
