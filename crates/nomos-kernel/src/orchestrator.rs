//! Orchestrating validator: run every target through its validator and seal
//! the results into one report.
//!
//! A panic inside one validator becomes an `internal` finding for that
//! target; the remaining targets still run. With `jobs > 1` targets are
//! spread over scoped worker threads and merged back in target order, so
//! the report is identical to a sequential run.

use crate::context::ValidationContext;
use crate::namespace::validate_namespace;
use crate::naming::validate_naming;
use crate::outcome::{CheckOutcome, IssueClass, rule_id};
use crate::path::check_path;
use crate::reference::check_reference;
use crate::report::{ReportBuilder, ValidationReport};
use crate::target::Target;
use crate::urn::validate_urn;
use chrono::{DateTime, Utc};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Dispatch one target to its validator.
pub fn check_target(ctx: &ValidationContext<'_>, target: &Target) -> CheckOutcome {
    match target {
        Target::Naming { value, target_type } => validate_naming(ctx, value, *target_type),
        Target::Namespace {
            value,
            check_registration,
        } => validate_namespace(ctx, value, *check_registration),
        Target::Urn {
            value,
            check_registration,
        } => validate_urn(ctx, value, *check_registration),
        Target::Path(check) => check_path(ctx, check).0,
        Target::Reference { value, location } => check_reference(ctx, value, location),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'a> {
    ctx: ValidationContext<'a>,
    jobs: usize,
}

impl<'a> Orchestrator<'a> {
    pub fn new(ctx: ValidationContext<'a>) -> Self {
        Self { ctx, jobs: 1 }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Run with a fresh run id and the current time.
    pub fn run(&self, targets: &[Target]) -> ValidationReport {
        self.run_as(targets, uuid::Uuid::new_v4().to_string(), Utc::now())
    }

    pub fn run_as(
        &self,
        targets: &[Target],
        run_id: String,
        timestamp: DateTime<Utc>,
    ) -> ValidationReport {
        self.run_with(targets, run_id, timestamp, check_target)
    }

    pub(crate) fn run_with<F>(
        &self,
        targets: &[Target],
        run_id: String,
        timestamp: DateTime<Utc>,
        check: F,
    ) -> ValidationReport
    where
        F: Fn(&ValidationContext<'_>, &Target) -> CheckOutcome + Sync,
    {
        tracing::info!(run_id = %run_id, targets = targets.len(), jobs = self.jobs, "validation run started");
        let outcomes = if self.jobs <= 1 || targets.len() <= 1 {
            targets
                .iter()
                .map(|target| isolated(&self.ctx, target, &check))
                .collect::<Vec<_>>()
        } else {
            self.fan_out(targets, &check)
        };

        let mut builder = ReportBuilder::new(self.ctx.spec.versions());
        for (target, outcome) in targets.iter().zip(outcomes) {
            builder.push(target, outcome);
        }
        let report = builder.finish(run_id, timestamp);
        tracing::info!(
            run_id = %report.run_id,
            verdict = %report.verdict,
            errors = report.summary.errors,
            warnings = report.summary.warnings,
            "validation run finished"
        );
        report
    }

    fn fan_out<F>(&self, targets: &[Target], check: &F) -> Vec<CheckOutcome>
    where
        F: Fn(&ValidationContext<'_>, &Target) -> CheckOutcome + Sync,
    {
        let chunk = targets.len().div_ceil(self.jobs);
        let ctx = &self.ctx;
        let mut merged: Vec<(usize, CheckOutcome)> = std::thread::scope(|scope| {
            let workers: Vec<_> = targets
                .chunks(chunk)
                .enumerate()
                .map(|(worker, slice)| {
                    scope.spawn(move || {
                        slice
                            .iter()
                            .enumerate()
                            .map(|(offset, target)| {
                                (worker * chunk + offset, isolated(ctx, target, check))
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            let mut collected = Vec::with_capacity(targets.len());
            for (worker, handle) in workers.into_iter().enumerate() {
                match handle.join() {
                    Ok(results) => collected.extend(results),
                    // `isolated` already catches validator panics; this only
                    // covers a worker dying outside of one.
                    Err(_) => {
                        let start = worker * chunk;
                        let end = (start + chunk).min(targets.len());
                        collected.extend((start..end).map(|index| {
                            (index, internal_failure("worker thread terminated"))
                        }));
                    }
                }
            }
            collected
        });
        merged.sort_by_key(|(index, _)| *index);
        merged.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

fn isolated<F>(ctx: &ValidationContext<'_>, target: &Target, check: &F) -> CheckOutcome
where
    F: Fn(&ValidationContext<'_>, &Target) -> CheckOutcome,
{
    tracing::debug!(kind = target.kind(), target = target.value(), "checking target");
    match catch_unwind(AssertUnwindSafe(|| check(ctx, target))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(kind = target.kind(), target = target.value(), %detail, "validator panicked");
            internal_failure(&format!("validator panicked: {detail}"))
        }
    }
}

fn internal_failure(message: &str) -> CheckOutcome {
    let mut out = CheckOutcome::new();
    out.error(rule_id::INTERNAL, IssueClass::Internal, message);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Verdict;
    use crate::test_support::Fixture;
    use nomos_spec::TargetType;

    fn targets() -> Vec<Target> {
        vec![
            Target::Naming {
                value: "root.config.yaml".into(),
                target_type: TargetType::File,
            },
            Target::Namespace {
                value: "machinenativeops.core".into(),
                check_registration: false,
            },
            Target::Naming {
                value: "Bad_Name".into(),
                target_type: TargetType::Directory,
            },
            Target::Namespace {
                value: "acme/core".into(),
                check_registration: false,
            },
        ]
    }

    #[test]
    fn verdict_follows_worst_target() {
        let fx = Fixture::builtin();
        let orchestrator = Orchestrator::new(fx.ctx());
        let report = orchestrator.run(&targets());
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.warned, 1);

        let passing = orchestrator.run(&targets()[..2]);
        assert_eq!(passing.verdict, Verdict::Pass);
        let warning = orchestrator.run(&targets()[3..]);
        assert_eq!(warning.verdict, Verdict::Warn);
    }

    #[test]
    fn panicking_validator_is_isolated() {
        let fx = Fixture::builtin();
        let orchestrator = Orchestrator::new(fx.ctx());
        let report = orchestrator.run_with(
            &targets(),
            "run".into(),
            Utc::now(),
            |ctx: &ValidationContext<'_>, target: &Target| {
                if target.value() == "machinenativeops.core" {
                    panic!("boom");
                }
                check_target(ctx, target)
            },
        );
        assert_eq!(report.targets.len(), 4);
        let internal: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.class == IssueClass::Internal)
            .collect();
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].target, "machinenativeops.core");
        assert!(internal[0].message.contains("boom"));
        assert_eq!(report.targets[0].verdict, Verdict::Pass);
        assert_eq!(report.targets[3].verdict, Verdict::Warn);
    }

    #[test]
    fn parallel_run_matches_sequential_run() {
        let fx = Fixture::builtin();
        let mut many = Vec::new();
        for _ in 0..5 {
            many.extend(targets());
        }
        let at = Utc::now();
        let sequential = Orchestrator::new(fx.ctx()).run_as(&many, "r".into(), at);
        let parallel = Orchestrator::new(fx.ctx())
            .with_jobs(3)
            .run_as(&many, "r".into(), at);
        assert_eq!(sequential, parallel);
    }
}
