use crate::cli::GlobalArgs;
use crate::support::{fail_load, load_or_exit, print_json, print_outcome};
use nomos_kernel::{
    CheckOutcome, Orchestrator, PathCheck, Target, TargetManifest, ValidationContext, Verdict,
    changed_file_targets, check_path, check_target, reference_targets, registry_targets,
    write_evidence,
};
use nomos_spec::{PathOperation, TargetType, WritePolicy};
use serde_json::json;
use std::path::{Path, PathBuf};

pub struct AllArgs {
    pub changed_files: Vec<String>,
    pub changed_files_list: Option<PathBuf>,
    pub no_registry: bool,
    pub no_manifest: bool,
    pub jobs: Option<usize>,
    pub no_evidence: bool,
    pub check_references: bool,
}

pub struct PathArgs {
    pub path: String,
    pub operation: Option<PathOperation>,
    pub check_write_policy: bool,
    pub approved: bool,
    pub declared_policy: Option<WritePolicy>,
}

fn read_changed_list(path: &Path) -> Vec<String> {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail_load(format!("failed to read {}: {e}", path.display())));
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn run_all(global: &GlobalArgs, args: AllArgs) {
    let (workspace, spec, registry) = load_or_exit(global);
    let config = &workspace.config.validation;

    let mut targets = Vec::new();
    let manifest_path = workspace.targets_path();
    if !args.no_manifest && manifest_path.is_file() {
        let manifest = TargetManifest::load(&manifest_path).unwrap_or_else(|e| fail_load(e));
        targets.extend(manifest.targets);
    }
    let mut changed = args.changed_files;
    if let Some(list) = &args.changed_files_list {
        changed.extend(read_changed_list(list));
    }
    for file in &changed {
        targets.extend(changed_file_targets(file));
    }
    if config.include_registry && !args.no_registry {
        targets.extend(registry_targets(&registry));
    }
    if config.check_references || args.check_references {
        targets.extend(reference_targets(&registry));
    }

    let ctx = ValidationContext::new(&spec, &registry).with_root(&workspace.root);
    let jobs = args.jobs.unwrap_or(config.jobs);
    let report = Orchestrator::new(ctx).with_jobs(jobs).run(&targets);

    let evidence = if config.write_evidence && !args.no_evidence {
        Some(write_evidence(workspace.evidence_dir(), &report).unwrap_or_else(|e| fail_load(e)))
    } else {
        None
    };

    if global.json {
        print_json(&report);
        if report.verdict == Verdict::Fail {
            eprint!("{}", report.to_markdown());
        }
    } else {
        let s = &report.summary;
        println!("nomos validate all");
        println!("  Run: {}", report.run_id);
        println!("  Verdict: {}", report.verdict);
        println!(
            "  Targets: {} ({} passed, {} warned, {} failed)",
            s.targets, s.passed, s.warned, s.failed
        );
        println!("  Findings: {} errors, {} warnings", s.errors, s.warnings);
        println!("  Content digest: {}", report.content_digest);
        if let Some(paths) = &evidence {
            println!("  Evidence: {}", paths.json.display());
            println!("  Narrative: {}", paths.markdown.display());
        }
        if report.verdict == Verdict::Fail {
            println!();
            print!("{}", report.to_markdown());
        }
    }
    std::process::exit(report.verdict.exit_code());
}

fn finish_single(
    global: &GlobalArgs,
    target: &Target,
    outcome: CheckOutcome,
    extra: serde_json::Value,
) {
    let verdict = Verdict::of(&outcome);
    if global.json {
        let mut payload = json!({
            "kind": target.kind(),
            "target": target.value(),
            "check": target.qualifier(),
            "verdict": verdict,
            "errors": outcome.errors,
            "warnings": outcome.warnings,
        });
        if let (Some(map), serde_json::Value::Object(extra)) = (payload.as_object_mut(), extra) {
            map.extend(extra);
        }
        print_json(&payload);
    } else {
        println!(
            "nomos validate {} {} ({})",
            target.kind(),
            target.value(),
            target.qualifier()
        );
        if let Some(resolution) = extra.get("resolution").filter(|r| !r.is_null()) {
            let rule = resolution
                .get("rule")
                .and_then(|r| r.as_str())
                .unwrap_or("default policy");
            let policy = resolution
                .get("policy")
                .and_then(|p| p.as_str())
                .unwrap_or("?");
            println!("  Resolved: {policy} (rule `{rule}`)");
        }
        println!("  Verdict: {verdict}");
        print_outcome(&outcome);
    }
    std::process::exit(verdict.exit_code());
}

fn run_single(global: &GlobalArgs, target: Target) {
    let (_workspace, spec, registry) = load_or_exit(global);
    let ctx = ValidationContext::new(&spec, &registry);
    let outcome = check_target(&ctx, &target);
    finish_single(global, &target, outcome, json!({}));
}

pub fn run_naming(global: &GlobalArgs, value: String, target_type: TargetType) {
    run_single(global, Target::Naming { value, target_type });
}

pub fn run_namespace(global: &GlobalArgs, value: String, check_registration: bool) {
    run_single(
        global,
        Target::Namespace {
            value,
            check_registration,
        },
    );
}

pub fn run_urn(global: &GlobalArgs, value: String, check_registration: bool) {
    run_single(
        global,
        Target::Urn {
            value,
            check_registration,
        },
    );
}

pub fn run_path(global: &GlobalArgs, args: PathArgs) {
    let (_workspace, spec, registry) = load_or_exit(global);
    let ctx = ValidationContext::new(&spec, &registry);
    let check = PathCheck {
        value: args.path,
        operation: args.operation.unwrap_or_default(),
        check_write_policy: args.check_write_policy,
        approved: args.approved,
        declared_policy: args.declared_policy,
    };
    let (outcome, resolution) = check_path(&ctx, &check);
    let target = Target::Path(check);
    finish_single(global, &target, outcome, json!({ "resolution": resolution }));
}
