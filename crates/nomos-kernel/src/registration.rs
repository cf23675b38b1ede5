//! Write-time validation for registry mutations.
//!
//! Values are checked against the specification store before they reach the
//! registry; the registry itself only enforces key uniqueness and status
//! transitions.

use crate::context::ValidationContext;
use crate::error::NomosError;
use crate::namespace::{split_namespace, validate_namespace};
use crate::outcome::{CheckOutcome, Diagnostic, IssueClass, rule_id};
use crate::path::{is_strictly_within, normalize_path};
use crate::urn::{parse_urn, validate_urn};
use chrono::{DateTime, Utc};
use nomos_registry::{EntryStatus, Lookup, NamespaceEntry, RegistryStore, UrnEntry};
use nomos_spec::SpecStore;

fn registration_error(message: String) -> Diagnostic {
    Diagnostic::new(rule_id::NAMESPACE_REGISTRATION, IssueClass::Registration, message)
}

fn reject_new_status(value: &str, status: EntryStatus) -> Result<(), NomosError> {
    if status == EntryStatus::Deprecated {
        return Err(NomosError::rejected(
            value,
            vec![registration_error(format!(
                "`{value}` cannot be registered as deprecated"
            ))],
        ));
    }
    Ok(())
}

/// Validate and insert a namespace.
///
/// The namespace must be written with the canonical separator. A
/// hierarchical namespace needs an active registered parent, and its
/// directory (if any) must lie inside the parent's.
pub fn register_namespace(
    spec: &SpecStore,
    registry: &mut RegistryStore,
    mut entry: NamespaceEntry,
) -> Result<(), NomosError> {
    reject_new_status(&entry.namespace, entry.status)?;
    {
        let ctx = ValidationContext::new(spec, registry);
        let outcome = validate_namespace(&ctx, &entry.namespace, false);
        if !outcome.ok() {
            return Err(NomosError::rejected(&entry.namespace, outcome.errors));
        }
        if outcome.has_warning(rule_id::NAMESPACE_SEPARATOR) {
            return Err(NomosError::rejected(
                &entry.namespace,
                vec![Diagnostic::new(
                    rule_id::NAMESPACE_SEPARATOR,
                    IssueClass::RuleViolation,
                    format!(
                        "register `{}` with the canonical separator `{}`",
                        entry.namespace, spec.namespace.settings.separator
                    ),
                )],
            ));
        }

        if let Some(directory) = entry.directory.take() {
            match normalize_path(&directory) {
                Ok(normalized) => entry.directory = Some(normalized),
                Err(message) => {
                    return Err(NomosError::rejected(
                        &entry.namespace,
                        vec![Diagnostic::new(rule_id::PATH_PARSE, IssueClass::Parse, message)],
                    ));
                }
            }
        }

        let mut scratch = CheckOutcome::new();
        let parent = split_namespace(&ctx, &entry.namespace, &mut scratch)
            .and_then(|split| split.ancestors(spec.namespace.settings.separator).into_iter().next());
        if let Some(parent) = parent {
            check_parent(&ctx, &entry, &parent)?;
        }
    }

    registry.insert_namespace(entry.clone())?;
    tracing::info!(namespace = %entry.namespace, owner = %entry.owner, "registered namespace");
    Ok(())
}

fn check_parent(
    ctx: &ValidationContext<'_>,
    entry: &NamespaceEntry,
    parent: &str,
) -> Result<(), NomosError> {
    let reject = |message: String| NomosError::rejected(&entry.namespace, vec![registration_error(message)]);
    let parent_entry = match ctx.registry.namespace(parent) {
        Lookup::Unique(parent_entry) => parent_entry,
        Lookup::Missing => {
            return Err(reject(format!("parent namespace `{parent}` is not registered")));
        }
        Lookup::Duplicate(entries) => {
            return Err(NomosError::rejected(
                &entry.namespace,
                vec![Diagnostic::new(
                    rule_id::NAMESPACE_UNIQUENESS,
                    IssueClass::DataIntegrity,
                    format!("parent `{parent}` has {} registry entries", entries.len()),
                )],
            ));
        }
    };
    if parent_entry.status != EntryStatus::Active {
        return Err(reject(format!(
            "parent namespace `{parent}` is {}, not active",
            parent_entry.status
        )));
    }
    if let (Some(child_dir), Some(parent_dir)) =
        (entry.directory.as_deref(), parent_entry.directory.as_deref())
    {
        let parent_dir = normalize_path(parent_dir).unwrap_or_default();
        if !is_strictly_within(child_dir, &parent_dir) {
            return Err(NomosError::rejected(
                &entry.namespace,
                vec![Diagnostic::new(
                    rule_id::NAMESPACE_BOUNDARY,
                    IssueClass::Registration,
                    format!("directory `{child_dir}` is not inside parent directory `{parent_dir}`"),
                )],
            ));
        }
    }
    Ok(())
}

/// Validate and insert a URN. Its namespace must be registered and active.
pub fn register_urn(
    spec: &SpecStore,
    registry: &mut RegistryStore,
    entry: UrnEntry,
) -> Result<(), NomosError> {
    reject_new_status(&entry.urn, entry.status)?;
    {
        let ctx = ValidationContext::new(spec, registry);
        let outcome = validate_urn(&ctx, &entry.urn, false);
        if !outcome.ok() {
            return Err(NomosError::rejected(&entry.urn, outcome.errors));
        }
        if entry.location.trim().is_empty() {
            return Err(NomosError::rejected(
                &entry.urn,
                vec![Diagnostic::new(
                    rule_id::URN_REGISTRATION,
                    IssueClass::Registration,
                    "storage location is empty",
                )],
            ));
        }
        let urn = parse_urn(&ctx, &entry.urn)
            .map_err(|diagnostic| NomosError::rejected(&entry.urn, vec![diagnostic]))?;
        let namespace_ok = matches!(
            ctx.registry.namespace(&urn.namespace),
            Lookup::Unique(ns) if ns.status == EntryStatus::Active
        );
        if !namespace_ok {
            return Err(NomosError::rejected(
                &entry.urn,
                vec![Diagnostic::new(
                    rule_id::URN_REGISTRATION,
                    IssueClass::Registration,
                    format!("namespace `{}` is not registered and active", urn.namespace),
                )],
            ));
        }
    }

    registry.insert_urn(entry.clone())?;
    tracing::info!(urn = %entry.urn, location = %entry.location, "registered urn");
    Ok(())
}

/// Mark a namespace deprecated. Returns `false` if it already was.
pub fn deprecate_namespace(
    registry: &mut RegistryStore,
    namespace: &str,
    at: DateTime<Utc>,
) -> Result<bool, NomosError> {
    Ok(registry.set_namespace_status(namespace, EntryStatus::Deprecated, at)?)
}

/// Mark a URN deprecated. Returns `false` if it already was.
pub fn deprecate_urn(
    registry: &mut RegistryStore,
    urn: &str,
    at: DateTime<Utc>,
) -> Result<bool, NomosError> {
    Ok(registry.set_urn_status(urn, EntryStatus::Deprecated, at)?)
}
