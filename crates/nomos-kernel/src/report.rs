//! Validation reports: ordered findings, per-target verdicts, an overall
//! verdict, and a run-independent content digest.

use crate::outcome::{CheckOutcome, Diagnostic, IssueClass};
use crate::target::Target;
use crate::witness::{FindingKey, compute_finding_id, content_digest};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

pub const REPORT_KIND: &str = "nomos.validation_report.v1";
pub const REPORT_SCHEMA: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

impl Verdict {
    pub fn of(outcome: &CheckOutcome) -> Self {
        if !outcome.errors.is_empty() {
            Verdict::Fail
        } else if !outcome.warnings.is_empty() {
            Verdict::Warn
        } else {
            Verdict::Pass
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Warn => "warn",
            Verdict::Fail => "fail",
        }
    }

    /// Process exit code: warnings do not fail a run.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Pass | Verdict::Warn => 0,
            Verdict::Fail => 1,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingOutcome {
    Error,
    Warning,
}

impl FindingOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingOutcome::Error => "error",
            FindingOutcome::Warning => "warning",
        }
    }
}

/// One `(target, rule, outcome, message)` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub finding_id: String,
    pub target_kind: String,
    pub target: String,
    pub rule: String,
    pub class: IssueClass,
    pub outcome: FindingOutcome,
    pub message: String,
}

impl Finding {
    fn new(target: &Target, outcome: FindingOutcome, diagnostic: Diagnostic) -> Self {
        let finding_id = compute_finding_id(FindingKey {
            kind: target.kind(),
            target: target.value(),
            rule: &diagnostic.rule,
            class: diagnostic.class.as_str(),
            outcome: outcome.as_str(),
            message: &diagnostic.message,
        });
        Self {
            finding_id,
            target_kind: target.kind().to_string(),
            target: target.value().to_string(),
            rule: diagnostic.rule,
            class: diagnostic.class,
            outcome,
            message: diagnostic.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetResult {
    pub kind: String,
    pub target: String,
    pub check: String,
    pub verdict: Verdict,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub targets: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub schema: u32,
    pub report_kind: String,
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub spec_versions: BTreeMap<String, String>,
    pub verdict: Verdict,
    pub summary: Summary,
    pub targets: Vec<TargetResult>,
    pub findings: Vec<Finding>,
    /// Digest over everything above except `runId` and `timestamp`.
    pub content_digest: String,
}

/// Collects per-target outcomes in target order, then seals a report.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    spec_versions: BTreeMap<String, String>,
    targets: Vec<TargetResult>,
    findings: Vec<Finding>,
}

impl ReportBuilder {
    pub fn new(spec_versions: BTreeMap<String, String>) -> Self {
        Self {
            spec_versions,
            ..Self::default()
        }
    }

    pub fn push(&mut self, target: &Target, outcome: CheckOutcome) {
        self.targets.push(TargetResult {
            kind: target.kind().to_string(),
            target: target.value().to_string(),
            check: target.qualifier(),
            verdict: Verdict::of(&outcome),
            errors: outcome.errors.len(),
            warnings: outcome.warnings.len(),
        });
        for diagnostic in outcome.errors {
            self.findings
                .push(Finding::new(target, FindingOutcome::Error, diagnostic));
        }
        for diagnostic in outcome.warnings {
            self.findings
                .push(Finding::new(target, FindingOutcome::Warning, diagnostic));
        }
    }

    pub fn finish(self, run_id: impl Into<String>, timestamp: DateTime<Utc>) -> ValidationReport {
        let mut summary = Summary {
            targets: self.targets.len(),
            ..Summary::default()
        };
        for result in &self.targets {
            match result.verdict {
                Verdict::Pass => summary.passed += 1,
                Verdict::Warn => summary.warned += 1,
                Verdict::Fail => summary.failed += 1,
            }
            summary.errors += result.errors;
            summary.warnings += result.warnings;
        }
        let verdict = if summary.errors > 0 {
            Verdict::Fail
        } else if summary.warnings > 0 {
            Verdict::Warn
        } else {
            Verdict::Pass
        };

        let digest_input = json!({
            "schema": REPORT_SCHEMA,
            "reportKind": REPORT_KIND,
            "specVersions": self.spec_versions,
            "verdict": verdict,
            "summary": summary,
            "targets": self.targets,
            "findings": self.findings,
        });

        ValidationReport {
            schema: REPORT_SCHEMA,
            report_kind: REPORT_KIND.to_string(),
            run_id: run_id.into(),
            timestamp,
            spec_versions: self.spec_versions,
            verdict,
            summary,
            targets: self.targets,
            findings: self.findings,
            content_digest: content_digest(&digest_input),
        }
    }
}

fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.outcome == FindingOutcome::Error)
    }

    /// Narrative evidence: the same tuples as the JSON form, for humans.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let s = &self.summary;
        let _ = writeln!(md, "# Validation report\n");
        let _ = writeln!(md, "- Run: `{}`", self.run_id);
        let _ = writeln!(
            md,
            "- Timestamp: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let _ = writeln!(md, "- Verdict: **{}**", self.verdict.as_str().to_uppercase());
        let _ = writeln!(
            md,
            "- Targets: {} ({} passed, {} warned, {} failed)",
            s.targets, s.passed, s.warned, s.failed
        );
        let _ = writeln!(md, "- Findings: {} errors, {} warnings", s.errors, s.warnings);
        let _ = writeln!(md, "- Content digest: `{}`\n", self.content_digest);

        let _ = writeln!(md, "## Specifications\n");
        let _ = writeln!(md, "| Category | Version |\n|---|---|");
        for (category, version) in &self.spec_versions {
            let _ = writeln!(md, "| {category} | {version} |");
        }

        let _ = writeln!(md, "\n## Targets\n");
        let _ = writeln!(md, "| # | Kind | Target | Check | Verdict |\n|---|---|---|---|---|");
        for (index, result) in self.targets.iter().enumerate() {
            let _ = writeln!(
                md,
                "| {} | {} | `{}` | {} | {} |",
                index + 1,
                result.kind,
                cell(&result.target),
                result.check,
                result.verdict
            );
        }

        let _ = writeln!(md, "\n## Findings\n");
        if self.findings.is_empty() {
            let _ = writeln!(md, "No findings.");
        }
        for finding in &self.findings {
            let _ = writeln!(
                md,
                "- **{}** {} `{}` [{}] ({}): {}",
                finding.outcome.as_str(),
                finding.target_kind,
                finding.target,
                finding.rule,
                finding.class,
                finding.message
            );
        }
        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::rule_id;
    use chrono::TimeZone;
    use nomos_spec::TargetType;

    fn naming(value: &str) -> Target {
        Target::Naming {
            value: value.to_string(),
            target_type: TargetType::File,
        }
    }

    fn sample(run_id: &str, at: DateTime<Utc>) -> ValidationReport {
        let mut builder = ReportBuilder::new(BTreeMap::from([
            ("naming".to_string(), "1.0.0".to_string()),
            ("paths".to_string(), "1.0.0".to_string()),
        ]));
        builder.push(&naming("root.config.yaml"), CheckOutcome::new());

        let mut warned = CheckOutcome::new();
        warned.warn(rule_id::NAMING_LENGTH, IssueClass::RuleViolation, "long name");
        builder.push(&naming("long-name.md"), warned);

        let mut failed = CheckOutcome::new();
        failed.error("naming.file-name", IssueClass::RuleViolation, "uppercase");
        failed.error(rule_id::NAMING_EXTENSION, IssueClass::RuleViolation, "two extensions");
        builder.push(&naming("A|B.tar.gz"), failed);
        builder.finish(run_id, at)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    #[test]
    fn verdict_and_summary() {
        let report = sample("run-1", at(0));
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.verdict.exit_code(), 1);
        assert_eq!(
            report.summary,
            Summary {
                targets: 3,
                passed: 1,
                warned: 1,
                failed: 1,
                errors: 2,
                warnings: 1,
            }
        );
        assert_eq!(report.findings.len(), 3);
        assert_eq!(report.errors().count(), 2);
        assert_eq!(Verdict::Warn.exit_code(), 0);
    }

    #[test]
    fn digest_ignores_run_id_and_timestamp() {
        let a = sample("run-a", at(0));
        let b = sample("run-b", at(3_600));
        assert_eq!(a.content_digest, b.content_digest);
        assert_eq!(a.findings, b.findings);
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn empty_report_passes() {
        let report = ReportBuilder::new(BTreeMap::new()).finish("r", at(0));
        assert_eq!(report.verdict, Verdict::Pass);
        assert!(report.to_markdown().contains("No findings."));
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let value = serde_json::to_value(sample("r", at(0))).expect("serialize");
        assert_eq!(value["reportKind"], REPORT_KIND);
        assert_eq!(value["findings"][0]["targetKind"], "naming");
        assert_eq!(value["findings"][0]["outcome"], "warning");
        assert!(value["contentDigest"].as_str().is_some_and(|d| d.starts_with("sha256:")));
    }

    #[test]
    fn markdown_narrative() {
        let report = sample("run-1", at(1_767_225_600));
        let md = report.to_markdown().replace(&report.content_digest, "<digest>");
        insta::assert_snapshot!(md, @r"
        # Validation report

        - Run: `run-1`
        - Timestamp: 2026-01-01T00:00:00Z
        - Verdict: **FAIL**
        - Targets: 3 (1 passed, 1 warned, 1 failed)
        - Findings: 2 errors, 1 warnings
        - Content digest: `<digest>`

        ## Specifications

        | Category | Version |
        |---|---|
        | naming | 1.0.0 |
        | paths | 1.0.0 |

        ## Targets

        | # | Kind | Target | Check | Verdict |
        |---|---|---|---|---|
        | 1 | naming | `root.config.yaml` | file | pass |
        | 2 | naming | `long-name.md` | file | warn |
        | 3 | naming | `A\|B.tar.gz` | file | fail |

        ## Findings

        - **warning** naming `long-name.md` [naming.length] (rule_violation): long name
        - **error** naming `A|B.tar.gz` [naming.file-name] (rule_violation): uppercase
        - **error** naming `A|B.tar.gz` [naming.extension] (rule_violation): two extensions
        ");
    }
}
