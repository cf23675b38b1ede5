use crate::cli::GlobalArgs;
use crate::support::{current_dir_or_exit, fail_load, print_json};
use nomos_kernel::init;
use serde_json::json;
use std::path::PathBuf;

pub fn run(global: &GlobalArgs, path: Option<PathBuf>) {
    let cwd = current_dir_or_exit();
    let target = path.or_else(|| global.root.clone()).unwrap_or_else(|| cwd.clone());
    let root = if target.is_absolute() { target } else { cwd.join(target) };

    let outcome = init(&root).unwrap_or_else(|e| fail_load(e));

    if global.json {
        let paths = |list: &[PathBuf]| -> Vec<String> {
            list.iter().map(|p| p.display().to_string()).collect()
        };
        print_json(&json!({
            "root": outcome.root.display().to_string(),
            "created": paths(&outcome.created),
            "skipped": paths(&outcome.skipped),
        }));
    } else {
        println!("nomos init {}", root.display());
        for path in &outcome.created {
            println!("  created: {}", path.display());
        }
        for path in &outcome.skipped {
            println!("  kept existing: {}", path.display());
        }
    }
}
