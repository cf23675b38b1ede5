//! Run every rule example and document vector through the validators.
//!
//! A specification whose own examples disagree with the validators is
//! reported before anything else trusts it.

use crate::context::ValidationContext;
use crate::namespace::validate_namespace;
use crate::naming::validate_naming;
use crate::outcome::CheckOutcome;
use crate::path::{PathCheck, check_path, normalize_path};
use crate::urn::validate_urn;
use nomos_spec::{Expectation, RuleCategory, RuleExamples, VectorDoc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    pub category: RuleCategory,
    /// Rule name for examples, `None` for document vectors.
    pub rule: Option<String>,
    pub value: String,
    pub expected: Expectation,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfCheckReport {
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
}

impl SelfCheckReport {
    pub fn ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn record(
        &mut self,
        category: RuleCategory,
        rule: Option<&str>,
        value: &str,
        expected: Expectation,
        passed: bool,
        detail: impl FnOnce() -> String,
    ) {
        self.checked += 1;
        let agrees = match expected {
            Expectation::Pass => passed,
            Expectation::Fail => !passed,
        };
        if !agrees {
            self.mismatches.push(Mismatch {
                category,
                rule: rule.map(str::to_string),
                value: value.to_string(),
                expected,
                detail: detail(),
            });
        }
    }
}

fn describe(outcome: &CheckOutcome) -> String {
    if outcome.errors.is_empty() {
        "validator reported no errors".to_string()
    } else {
        outcome
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn each_example(examples: &RuleExamples) -> impl Iterator<Item = (&str, Expectation)> {
    examples
        .pass
        .iter()
        .map(|v| (v.as_str(), Expectation::Pass))
        .chain(examples.fail.iter().map(|v| (v.as_str(), Expectation::Fail)))
}

pub fn selfcheck(ctx: &ValidationContext<'_>) -> SelfCheckReport {
    let mut report = SelfCheckReport::default();
    check_naming(ctx, &mut report);
    check_namespace(ctx, &mut report);
    check_urn(ctx, &mut report);
    check_paths(ctx, &mut report);
    tracing::debug!(
        checked = report.checked,
        mismatches = report.mismatches.len(),
        "specification self-check"
    );
    report
}

fn check_naming(ctx: &ValidationContext<'_>, report: &mut SelfCheckReport) {
    let spec = &ctx.spec.naming;
    for rule in &spec.rules {
        for target_type in &rule.applies_to {
            for (value, expected) in each_example(&rule.examples) {
                let outcome = validate_naming(ctx, value, *target_type);
                report.record(
                    RuleCategory::Naming,
                    Some(&rule.name),
                    value,
                    expected,
                    outcome.ok(),
                    || format!("as {target_type}: {}", describe(&outcome)),
                );
            }
        }
    }
    for vector in &spec.vectors {
        let Some(target_type) = vector.target_type else {
            report.checked += 1;
            report.mismatches.push(Mismatch {
                category: RuleCategory::Naming,
                rule: None,
                value: vector.value.clone(),
                expected: vector.expect,
                detail: "naming vector lacks target_type".to_string(),
            });
            continue;
        };
        let outcome = validate_naming(ctx, &vector.value, target_type);
        report.record(
            RuleCategory::Naming,
            None,
            &vector.value,
            vector.expect,
            outcome.ok(),
            || describe(&outcome),
        );
    }
}

fn check_namespace(ctx: &ValidationContext<'_>, report: &mut SelfCheckReport) {
    let spec = &ctx.spec.namespace;
    for rule in spec.all_rules() {
        for (value, expected) in each_example(&rule.examples) {
            let outcome = validate_namespace(ctx, value, false);
            report.record(
                RuleCategory::Namespace,
                Some(&rule.name),
                value,
                expected,
                outcome.ok(),
                || describe(&outcome),
            );
        }
    }
    for vector in &spec.vectors {
        let outcome = validate_namespace(ctx, &vector.value, false);
        report.record(
            RuleCategory::Namespace,
            None,
            &vector.value,
            vector.expect,
            outcome.ok(),
            || describe(&outcome),
        );
    }
}

fn check_urn(ctx: &ValidationContext<'_>, report: &mut SelfCheckReport) {
    let spec = &ctx.spec.urn;
    for rule in &spec.rules {
        for (value, expected) in each_example(&rule.examples) {
            let outcome = validate_urn(ctx, value, false);
            report.record(
                RuleCategory::Urn,
                Some(&rule.name),
                value,
                expected,
                outcome.ok(),
                || describe(&outcome),
            );
        }
    }
    for vector in &spec.vectors {
        let outcome = validate_urn(ctx, &vector.value, false);
        report.record(
            RuleCategory::Urn,
            None,
            &vector.value,
            vector.expect,
            outcome.ok(),
            || describe(&outcome),
        );
    }
}

fn check_paths(ctx: &ValidationContext<'_>, report: &mut SelfCheckReport) {
    let spec = &ctx.spec.paths;
    for path_rule in &spec.rules {
        let name = &path_rule.rule.name;
        for (value, expected) in each_example(&path_rule.rule.examples) {
            let resolved = normalize_path(value)
                .ok()
                .and_then(|path| spec.first_match(&path))
                .map(|hit| hit.rule.name.clone());
            report.record(
                RuleCategory::Paths,
                Some(name),
                value,
                expected,
                resolved.as_deref() == Some(name.as_str()),
                || match &resolved {
                    Some(other) => format!("resolves to rule `{other}`"),
                    None => "matches no rule".to_string(),
                },
            );
        }
    }
    for vector in &spec.vectors {
        check_path_vector(ctx, vector, report);
    }
}

fn check_path_vector(ctx: &ValidationContext<'_>, vector: &VectorDoc, report: &mut SelfCheckReport) {
    let check = match vector.operation {
        Some(operation) => PathCheck::new(vector.value.as_str()).writing(operation),
        None => PathCheck::new(vector.value.as_str()),
    };
    let (outcome, resolution) = check_path(ctx, &check);
    let resolved_policy = resolution.map(|r| r.policy);
    let policy_agrees = vector.policy.is_none() || vector.policy == resolved_policy;
    report.record(
        RuleCategory::Paths,
        None,
        &vector.value,
        vector.expect,
        outcome.ok(),
        || describe(&outcome),
    );
    if !policy_agrees {
        report.mismatches.push(Mismatch {
            category: RuleCategory::Paths,
            rule: None,
            value: vector.value.clone(),
            expected: vector.expect,
            detail: format!(
                "expected policy {}, resolved {}",
                vector.policy.map_or("none".to_string(), |p| p.to_string()),
                resolved_policy.map_or("none".to_string(), |p| p.to_string())
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn builtin_specification_agrees_with_validators() {
        let fx = Fixture::builtin();
        let report = selfcheck(&fx.ctx());
        assert!(report.ok(), "{:#?}", report.mismatches);
        assert!(report.checked > 50);
    }

    #[test]
    fn wrong_example_is_reported() {
        let naming = nomos_spec::SpecStore::builtin_documents()[0]
            .1
            .replace(r#"pass = ["core", "core-validator""#, r#"pass = ["Core", "core-validator""#);
        let fx = Fixture::with_naming_toml(&naming);
        let report = selfcheck(&fx.ctx());
        assert_eq!(report.mismatches.len(), 1);
        let mismatch = &report.mismatches[0];
        assert_eq!(mismatch.category, RuleCategory::Naming);
        assert_eq!(mismatch.rule.as_deref(), Some("identifier"));
        assert_eq!(mismatch.value, "Core");
        assert!(mismatch.detail.contains("naming.identifier"));
    }
}
