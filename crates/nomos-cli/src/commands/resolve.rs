use crate::cli::GlobalArgs;
use crate::support::{load_or_exit, print_diagnostics, print_json};
use nomos_kernel::{ValidationContext, resolve_urn};
use serde_json::json;

pub fn run(global: &GlobalArgs, urn: String) {
    let (_workspace, spec, registry) = load_or_exit(global);
    let ctx = ValidationContext::new(&spec, &registry);

    match resolve_urn(&ctx, &urn) {
        Ok(location) => {
            if global.json {
                print_json(&json!({ "resolved": true, "location": location }));
            } else {
                println!("nomos resolve {urn}");
                println!("  Location: {}", location.location);
                println!("  Owner: {}", location.owner);
                println!("  Status: {}", location.status);
                print_diagnostics("warning", &location.warnings);
            }
        }
        Err(err) => {
            if global.json {
                print_json(&json!({ "resolved": false, "error": err }));
            } else {
                println!("nomos resolve {urn}");
                println!("  Not found: {}", err.reason);
                print_diagnostics("error", &err.errors);
            }
            std::process::exit(1);
        }
    }
}
