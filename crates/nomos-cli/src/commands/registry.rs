use crate::cli::{GlobalArgs, RegistryKindArg};
use crate::support::{
    fail_mutation, load_or_exit, print_json, registry_or_exit, save_registry_or_exit,
    workspace_or_exit,
};
use chrono::Utc;
use nomos_kernel::{deprecate_namespace, deprecate_urn, register_namespace, register_urn};
use nomos_registry::{EntryStatus, NamespaceEntry, UrnEntry, Visibility};
use nomos_spec::WritePolicy;
use serde_json::json;

pub struct NamespaceArgs {
    pub namespace: String,
    pub owner: String,
    pub directory: Option<String>,
    pub visibility: Visibility,
    pub write_policy: WritePolicy,
    pub status: EntryStatus,
    pub description: String,
}

pub struct UrnArgs {
    pub urn: String,
    pub location: String,
    pub owner: String,
    pub status: EntryStatus,
    pub description: String,
}

pub fn run_list(global: &GlobalArgs, kind: Option<RegistryKindArg>, status: Option<EntryStatus>) {
    let workspace = workspace_or_exit(global);
    let registry = registry_or_exit(&workspace);
    let keep = |entry_status: EntryStatus| status.is_none_or(|wanted| wanted == entry_status);
    let show_namespaces = kind != Some(RegistryKindArg::Urn);
    let show_urns = kind != Some(RegistryKindArg::Namespace);

    let namespaces: Vec<&NamespaceEntry> = registry
        .namespaces()
        .iter()
        .filter(|entry| show_namespaces && keep(entry.status))
        .collect();
    let urns: Vec<&UrnEntry> = registry
        .urns()
        .iter()
        .filter(|entry| show_urns && keep(entry.status))
        .collect();

    if global.json {
        print_json(&json!({
            "registry": workspace.registry_dir().display().to_string(),
            "namespaces": namespaces,
            "urns": urns,
            "duplicates": registry.duplicate_keys(),
        }));
        return;
    }

    println!("nomos registry list");
    println!("  Source: {}", workspace.registry_dir().display());
    if show_namespaces {
        println!("  Namespaces ({}):", namespaces.len());
        for entry in &namespaces {
            let directory = entry.directory.as_deref().unwrap_or("-");
            println!(
                "    {} [{}] owner={} dir={} {}",
                entry.namespace, entry.status, entry.owner, directory, entry.visibility
            );
        }
    }
    if show_urns {
        println!("  URNs ({}):", urns.len());
        for entry in &urns {
            println!(
                "    {} [{}] owner={} -> {}",
                entry.urn, entry.status, entry.owner, entry.location
            );
        }
    }
    for duplicate in registry.duplicate_keys() {
        println!(
            "  duplicate: {} `{}` x{}",
            duplicate.kind, duplicate.key, duplicate.count
        );
    }
}

pub fn run_add_namespace(global: &GlobalArgs, args: NamespaceArgs) {
    let (workspace, spec, mut registry) = load_or_exit(global);
    let mut entry = NamespaceEntry::new(args.namespace, args.owner).with_status(args.status);
    if let Some(directory) = args.directory {
        entry = entry.with_directory(directory);
    }
    entry.visibility = args.visibility;
    entry.write_policy = args.write_policy;
    entry.description = args.description;
    let key = entry.namespace.clone();

    register_namespace(&spec, &mut registry, entry).unwrap_or_else(|e| fail_mutation(e));
    save_registry_or_exit(&workspace, &registry);
    report_write(global, "namespace", &key, "registered");
}

pub fn run_add_urn(global: &GlobalArgs, args: UrnArgs) {
    let (workspace, spec, mut registry) = load_or_exit(global);
    let mut entry = UrnEntry::new(args.urn, args.location, args.owner).with_status(args.status);
    entry.description = args.description;
    let key = entry.urn.clone();

    register_urn(&spec, &mut registry, entry).unwrap_or_else(|e| fail_mutation(e));
    save_registry_or_exit(&workspace, &registry);
    report_write(global, "urn", &key, "registered");
}

pub fn run_deprecate_namespace(global: &GlobalArgs, namespace: String) {
    let workspace = workspace_or_exit(global);
    let mut registry = registry_or_exit(&workspace);
    let changed = deprecate_namespace(&mut registry, &namespace, Utc::now())
        .unwrap_or_else(|e| fail_mutation(e));
    if changed {
        save_registry_or_exit(&workspace, &registry);
    }
    let action = if changed { "deprecated" } else { "already deprecated" };
    report_write(global, "namespace", &namespace, action);
}

pub fn run_deprecate_urn(global: &GlobalArgs, urn: String) {
    let workspace = workspace_or_exit(global);
    let mut registry = registry_or_exit(&workspace);
    let changed =
        deprecate_urn(&mut registry, &urn, Utc::now()).unwrap_or_else(|e| fail_mutation(e));
    if changed {
        save_registry_or_exit(&workspace, &registry);
    }
    let action = if changed { "deprecated" } else { "already deprecated" };
    report_write(global, "urn", &urn, action);
}

fn report_write(global: &GlobalArgs, kind: &str, key: &str, action: &str) {
    if global.json {
        print_json(&json!({ "kind": kind, "key": key, "action": action }));
    } else {
        println!("{kind} `{key}` {action}");
    }
}
