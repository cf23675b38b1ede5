use crate::cli::GlobalArgs;
use nomos_kernel::{CheckOutcome, Diagnostic, NomosError, Workspace, resolve_root};
use nomos_registry::{RegistryError, RegistryStore};
use nomos_spec::SpecStore;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exit code for specification, registry, config, and I/O load failures.
pub const EXIT_LOAD_FAILURE: i32 = 2;

pub fn init_logging(level: Option<&str>) {
    let filter = match level.map(|directive| (directive, EnvFilter::try_new(directive))) {
        Some((_, Ok(filter))) => filter,
        Some((directive, Err(e))) => {
            eprintln!("warning: ignoring log level `{directive}`: {e}; using `warn`");
            EnvFilter::new("warn")
        }
        None => EnvFilter::new("warn"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

pub fn fail_load(err: impl std::fmt::Display) -> ! {
    eprintln!("error: {err}");
    std::process::exit(EXIT_LOAD_FAILURE);
}

pub fn current_dir_or_exit() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|e| fail_load(format!("cannot read current directory: {e}")))
}

pub fn workspace_or_exit(global: &GlobalArgs) -> Workspace {
    let cwd = current_dir_or_exit();
    let root = resolve_root(global.root.as_deref(), &cwd);
    Workspace::load(root, global.config.as_deref()).unwrap_or_else(|e| fail_load(e))
}

pub fn specs_or_exit(workspace: &Workspace) -> SpecStore {
    workspace.load_specs().unwrap_or_else(|e| fail_load(e))
}

pub fn registry_or_exit(workspace: &Workspace) -> RegistryStore {
    workspace.load_registry().unwrap_or_else(|e| fail_load(e))
}

/// Everything a read-only command needs.
pub fn load_or_exit(global: &GlobalArgs) -> (Workspace, SpecStore, RegistryStore) {
    let workspace = workspace_or_exit(global);
    let spec = specs_or_exit(&workspace);
    let registry = registry_or_exit(&workspace);
    tracing::debug!(
        specs = %workspace.specs_dir().display(),
        namespaces = registry.namespaces().len(),
        urns = registry.urns().len(),
        "stores loaded"
    );
    (workspace, spec, registry)
}

pub fn save_registry_or_exit(workspace: &Workspace, registry: &RegistryStore) {
    registry
        .save(workspace.registry_dir())
        .unwrap_or_else(|e| fail_load(e));
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => fail_load(format!("json serialization failed: {e}")),
    }
}

pub fn print_diagnostics(label: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        println!("  {label} {diagnostic} ({})", diagnostic.class);
    }
}

pub fn print_outcome(outcome: &CheckOutcome) {
    print_diagnostics("error", &outcome.errors);
    print_diagnostics("warning", &outcome.warnings);
}

/// A rejected registry write exits 1; anything else is a load failure.
pub fn fail_mutation(err: NomosError) -> ! {
    match err {
        NomosError::Rejected { value, diagnostics } => {
            eprintln!("error: {value} rejected");
            for diagnostic in &diagnostics {
                eprintln!("  {diagnostic}");
            }
            std::process::exit(1);
        }
        NomosError::Registry(e)
            if !matches!(e, RegistryError::Jsonl(_) | RegistryError::Missing { .. }) =>
        {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        other => fail_load(other),
    }
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
