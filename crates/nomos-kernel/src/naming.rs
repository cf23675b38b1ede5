//! Naming validator: one string against the rules for its target type.

use crate::context::ValidationContext;
use crate::outcome::{CheckOutcome, IssueClass, rule_id};
use nomos_spec::TargetType;

/// Check `value` as a `target_type` name. Every broken rule is reported
/// separately; malformed input never panics.
pub fn validate_naming(
    ctx: &ValidationContext<'_>,
    value: &str,
    target_type: TargetType,
) -> CheckOutcome {
    let spec = &ctx.spec.naming;
    let settings = &spec.settings;
    let mut out = CheckOutcome::new();

    if value.is_empty() {
        out.error(
            rule_id::NAMING_EMPTY,
            IssueClass::RuleViolation,
            format!("{target_type} name is empty"),
        );
        return out;
    }

    let length = value.chars().count();
    if length > settings.max_length {
        out.error(
            rule_id::NAMING_LENGTH,
            IssueClass::RuleViolation,
            format!(
                "`{value}` is {length} characters; maximum is {}",
                settings.max_length
            ),
        );
    } else if let Some(recommended) = settings.recommended_length {
        if length > recommended {
            out.warn(
                rule_id::NAMING_LENGTH,
                IssueClass::RuleViolation,
                format!("`{value}` is {length} characters; recommended maximum is {recommended}"),
            );
        }
    }

    let exempt = spec.exempt_prefix(value);
    if spec.is_reserved(value) {
        out.error(
            rule_id::NAMING_RESERVED,
            IssueClass::RuleViolation,
            format!("`{value}` is a reserved name"),
        );
    } else if target_type == TargetType::File && exempt.is_none() {
        if let Some((stem, _)) = value.split_once('.') {
            if spec.is_reserved(stem) {
                out.error(
                    rule_id::NAMING_RESERVED,
                    IssueClass::RuleViolation,
                    format!("file stem `{stem}` of `{value}` is a reserved name"),
                );
            }
        }
    }

    for rule in spec.rules_for(target_type) {
        if !rule.is_match(value) {
            out.error(
                format!("naming.{}", rule.name),
                IssueClass::RuleViolation,
                format!("{target_type} `{value}`: {}", rule.explain()),
            );
        }
    }

    if target_type == TargetType::File {
        let counted = exempt.map_or(value, |prefix| &value[prefix.len()..]);
        let extensions = counted.matches('.').count();
        if extensions > settings.max_extensions {
            out.error(
                rule_id::NAMING_EXTENSION,
                IssueClass::RuleViolation,
                format!(
                    "`{value}` has {extensions} extensions; at most {} allowed",
                    settings.max_extensions
                ),
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    fn check(value: &str, target_type: TargetType) -> CheckOutcome {
        let fx = Fixture::builtin();
        validate_naming(&fx.ctx(), value, target_type)
    }

    #[test]
    fn root_prefixed_file_passes() {
        let out = check("root.config.yaml", TargetType::File);
        assert!(out.ok(), "{:?}", out.errors);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn extension_limit_applies_without_exempt_prefix() {
        let out = check("config.tar.gz", TargetType::File);
        assert_eq!(out.errors.len(), 1);
        assert!(out.has_error(rule_id::NAMING_EXTENSION));
    }

    #[test]
    fn reserved_stem_is_rejected_even_when_pattern_matches() {
        let out = check("system.yaml", TargetType::File);
        assert!(out.has_error(rule_id::NAMING_RESERVED));
        assert!(!out.has_error("naming.file-name"));
    }

    #[test]
    fn reserved_identifier_is_rejected() {
        let out = check("admin", TargetType::Identifier);
        assert_eq!(out.errors.len(), 1);
        assert!(out.has_error(rule_id::NAMING_RESERVED));
    }

    #[test]
    fn each_broken_rule_is_reported() {
        let out = check("Admin_Tools.Tar.Gz", TargetType::File);
        assert!(out.has_error("naming.file-name"));
        assert!(out.has_error(rule_id::NAMING_EXTENSION));
        assert_eq!(out.errors.len(), 2);
    }

    #[test]
    fn identifiers_must_start_with_a_letter() {
        assert!(!check("2core", TargetType::Identifier).ok());
        assert!(check("core-validator", TargetType::Identifier).ok());
    }

    #[test]
    fn versions_follow_semver_with_v_prefix() {
        assert!(check("v1.0.0", TargetType::Version).ok());
        assert!(check("v1.0", TargetType::Version).has_error("naming.version"));
        assert!(check("1.0.0", TargetType::Version).has_error("naming.version"));
    }

    #[test]
    fn empty_value_is_a_single_error() {
        let out = check("", TargetType::Directory);
        assert_eq!(out.errors.len(), 1);
        assert!(out.has_error(rule_id::NAMING_EMPTY));
    }

    #[test]
    fn long_names_warn_then_fail() {
        let warn = "a".repeat(70);
        let out = check(&warn, TargetType::Directory);
        assert!(out.ok());
        assert!(out.has_warning(rule_id::NAMING_LENGTH));

        let fail = "a".repeat(129);
        assert!(check(&fail, TargetType::Directory).has_error(rule_id::NAMING_LENGTH));
    }

    #[test]
    fn non_ascii_input_is_reported_not_panicking() {
        let out = check("réseau.md", TargetType::File);
        assert!(out.has_error("naming.file-name"));
    }
}
