use crate::cli::GlobalArgs;
use crate::support::{load_or_exit, print_json, yes_no};
use nomos_kernel::{ValidationContext, selfcheck};
use nomos_spec::Expectation;
use serde_json::json;

pub fn run_check(global: &GlobalArgs) {
    let (workspace, spec, registry) = load_or_exit(global);
    let report = selfcheck(&ValidationContext::new(&spec, &registry));

    if global.json {
        print_json(&json!({
            "specs": workspace.specs_dir().display().to_string(),
            "versions": spec.versions(),
            "ok": report.ok(),
            "checked": report.checked,
            "mismatches": report.mismatches,
        }));
    } else {
        println!("nomos spec check");
        println!("  Source: {}", workspace.specs_dir().display());
        for (category, version) in spec.versions() {
            println!("  {category}: {version}");
        }
        println!("  Checked: {}", report.checked);
        println!("  Consistent: {}", yes_no(report.ok()));
        for mismatch in &report.mismatches {
            let rule = mismatch.rule.as_deref().unwrap_or("vector");
            let expected = match mismatch.expected {
                Expectation::Pass => "pass",
                Expectation::Fail => "fail",
            };
            println!(
                "  - {}/{rule} `{}` expected {expected}: {}",
                mismatch.category, mismatch.value, mismatch.detail
            );
        }
    }
    if !report.ok() {
        std::process::exit(1);
    }
}
