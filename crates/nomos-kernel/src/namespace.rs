//! Namespace validator: separator handling, reserved tokens, depth, segment
//! rules, and optional registry checks.

use crate::context::ValidationContext;
use crate::naming::validate_naming;
use crate::outcome::{CheckOutcome, IssueClass, rule_id};
use crate::path::{is_strictly_within, normalize_path};
use nomos_registry::{EntryStatus, Lookup};
use nomos_spec::TargetType;

/// A namespace split into segments, with the separator it was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitNamespace<'v> {
    pub separator: char,
    pub segments: Vec<&'v str>,
}

impl SplitNamespace<'_> {
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The namespace written with the canonical separator: the registry key.
    pub fn canonical(&self, canonical_separator: char) -> String {
        self.segments.join(&canonical_separator.to_string())
    }

    /// Canonical keys of every proper ancestor, nearest first.
    pub fn ancestors(&self, canonical_separator: char) -> Vec<String> {
        let sep = canonical_separator.to_string();
        (1..self.segments.len())
            .rev()
            .map(|len| self.segments[..len].join(&sep))
            .collect()
    }
}

/// Split `value` on its hierarchy separator. Errors are parse diagnostics.
pub fn split_namespace<'v>(
    ctx: &ValidationContext<'_>,
    value: &'v str,
    out: &mut CheckOutcome,
) -> Option<SplitNamespace<'v>> {
    let settings = &ctx.spec.namespace.settings;
    if value.is_empty() {
        out.error(
            rule_id::NAMESPACE_PARSE,
            IssueClass::Parse,
            "namespace is empty",
        );
        return None;
    }

    let mut used: Vec<char> = std::iter::once(settings.separator)
        .chain(settings.alternate_separators.iter().copied())
        .filter(|sep| value.contains(*sep))
        .collect();
    used.dedup();
    if used.len() > 1 {
        let list: Vec<String> = used.iter().map(|sep| format!("`{sep}`")).collect();
        out.error(
            rule_id::NAMESPACE_SEPARATOR,
            IssueClass::Parse,
            format!("`{value}` mixes separators {}", list.join(" and ")),
        );
        return None;
    }
    let separator = used.first().copied().unwrap_or(settings.separator);
    if separator != settings.separator {
        out.warn(
            rule_id::NAMESPACE_SEPARATOR,
            IssueClass::RuleViolation,
            format!(
                "`{value}` uses alternate separator `{separator}`; canonical separator is `{}`",
                settings.separator
            ),
        );
    }

    let segments: Vec<&str> = value.split(separator).collect();
    if let Some(position) = segments.iter().position(|segment| segment.is_empty()) {
        out.error(
            rule_id::NAMESPACE_PARSE,
            IssueClass::Parse,
            format!("`{value}` has an empty segment at position {}", position + 1),
        );
        return None;
    }
    Some(SplitNamespace {
        separator,
        segments,
    })
}

fn reserved_segment<'v>(ctx: &ValidationContext<'_>, split: &SplitNamespace<'v>) -> Option<&'v str> {
    split.segments.iter().copied().find(|segment| {
        ctx.spec.namespace.is_reserved(segment) || ctx.spec.naming.is_reserved(segment)
    })
}

/// Validate a namespace; with `check_registration`, also consult the
/// registry for existence, status, parent, and directory boundary.
pub fn validate_namespace(
    ctx: &ValidationContext<'_>,
    value: &str,
    check_registration: bool,
) -> CheckOutcome {
    let spec = &ctx.spec.namespace;
    let mut out = CheckOutcome::new();
    let Some(split) = split_namespace(ctx, value, &mut out) else {
        return out;
    };

    if let Some(segment) = reserved_segment(ctx, &split) {
        out.error(
            rule_id::NAMESPACE_RESERVED,
            IssueClass::RuleViolation,
            format!("`{value}` uses reserved namespace segment `{segment}`"),
        );
        return out;
    }

    if split.depth() > spec.settings.max_depth {
        out.error(
            rule_id::NAMESPACE_DEPTH,
            IssueClass::RuleViolation,
            format!(
                "`{value}` has depth {}; maximum depth is {}",
                split.depth(),
                spec.settings.max_depth
            ),
        );
    }

    // Every segment is an identifier; the root additionally meets the root rule.
    for segment in &split.segments {
        let segment_outcome = validate_naming(ctx, segment, TargetType::Identifier);
        out.absorb(&format!("segment `{segment}`: "), segment_outcome);
    }
    let root = split.segments[0];
    if !spec.root_rule.is_match(root) {
        out.error(
            format!("namespace.{}", spec.root_rule.name),
            IssueClass::RuleViolation,
            format!("root segment `{root}`: {}", spec.root_rule.explain()),
        );
    }
    for rule in &spec.rules {
        if !rule.is_match(value) {
            out.error(
                format!("namespace.{}", rule.name),
                IssueClass::RuleViolation,
                format!("`{value}`: {}", rule.explain()),
            );
        }
    }

    if check_registration {
        check_registration_state(ctx, &split, &mut out);
    }
    out
}

fn check_registration_state(
    ctx: &ValidationContext<'_>,
    split: &SplitNamespace<'_>,
    out: &mut CheckOutcome,
) {
    let canonical_sep = ctx.spec.namespace.settings.separator;
    let key = split.canonical(canonical_sep);
    let entry = match ctx.registry.namespace(&key) {
        Lookup::Missing => {
            out.warn(
                rule_id::NAMESPACE_REGISTRATION,
                IssueClass::Registration,
                format!("namespace `{key}` is not registered"),
            );
            return;
        }
        Lookup::Duplicate(entries) => {
            tracing::warn!(namespace = %key, count = entries.len(), "duplicate namespace entries");
            out.error(
                rule_id::NAMESPACE_UNIQUENESS,
                IssueClass::DataIntegrity,
                format!("namespace `{key}` has {} registry entries", entries.len()),
            );
            return;
        }
        Lookup::Unique(entry) => entry,
    };

    match entry.status {
        EntryStatus::Active => {}
        EntryStatus::Deprecated => out.warn(
            rule_id::NAMESPACE_DEPRECATED,
            IssueClass::Registration,
            format!("namespace `{key}` is deprecated"),
        ),
        EntryStatus::Reserved => out.error(
            rule_id::NAMESPACE_RESERVED,
            IssueClass::Registration,
            format!("namespace `{key}` is reserved in the registry and cannot be allocated"),
        ),
    }

    let ancestors = split.ancestors(canonical_sep);
    if let Some(parent) = ancestors.first() {
        if ctx.registry.namespace(parent).is_missing() {
            out.warn(
                rule_id::NAMESPACE_PARENT,
                IssueClass::Registration,
                format!("parent namespace `{parent}` of `{key}` is not registered"),
            );
        }
    }

    let Some(directory) = entry.directory.as_deref() else {
        return;
    };
    let mapped_ancestor = ancestors.iter().find_map(|ancestor| {
        let parent = ctx.registry.namespace(ancestor).unique()?;
        parent
            .directory
            .as_deref()
            .map(|dir| (ancestor.as_str(), dir))
    });
    if let Some((ancestor, ancestor_dir)) = mapped_ancestor {
        let inside = match (normalize_path(directory), normalize_path(ancestor_dir)) {
            (Ok(child), Ok(parent)) => is_strictly_within(&child, &parent),
            _ => false,
        };
        if !inside {
            out.error(
                rule_id::NAMESPACE_BOUNDARY,
                IssueClass::Registration,
                format!(
                    "directory `{directory}` of `{key}` is not inside `{ancestor_dir}` of ancestor `{ancestor}`"
                ),
            );
        }
    }
}
