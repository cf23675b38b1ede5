//! Nomos CLI: the `nomos` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands, RegistryCommands, SpecCommands, ValidateCommands};

fn main() {
    let cli = Cli::parse();
    support::init_logging(cli.global.log_level.as_deref());
    let global = cli.global;

    match cli.command {
        Commands::Validate { command } => match command {
            ValidateCommands::All {
                changed_files,
                changed_files_list,
                no_registry,
                no_manifest,
                jobs,
                no_evidence,
                check_references,
            } => commands::validate::run_all(
                &global,
                commands::validate::AllArgs {
                    changed_files,
                    changed_files_list,
                    no_registry,
                    no_manifest,
                    jobs,
                    no_evidence,
                    check_references,
                },
            ),
            ValidateCommands::Naming {
                target,
                target_type,
            } => commands::validate::run_naming(&global, target, target_type),
            ValidateCommands::Namespace {
                namespace,
                check_registration,
            } => commands::validate::run_namespace(&global, namespace, check_registration),
            ValidateCommands::Urn {
                urn,
                check_registration,
            } => commands::validate::run_urn(&global, urn, check_registration),
            ValidateCommands::Path {
                path,
                operation,
                check_write_policy,
                approved,
                declared_policy,
            } => commands::validate::run_path(
                &global,
                commands::validate::PathArgs {
                    path,
                    operation,
                    check_write_policy,
                    approved,
                    declared_policy,
                },
            ),
        },

        Commands::Resolve { urn } => commands::resolve::run(&global, urn),

        Commands::Registry { command } => match command {
            RegistryCommands::List { kind, status } => {
                commands::registry::run_list(&global, kind, status)
            }
            RegistryCommands::AddNamespace {
                namespace,
                owner,
                directory,
                visibility,
                write_policy,
                status,
                description,
            } => commands::registry::run_add_namespace(
                &global,
                commands::registry::NamespaceArgs {
                    namespace,
                    owner,
                    directory,
                    visibility,
                    write_policy,
                    status,
                    description,
                },
            ),
            RegistryCommands::AddUrn {
                urn,
                location,
                owner,
                status,
                description,
            } => commands::registry::run_add_urn(
                &global,
                commands::registry::UrnArgs {
                    urn,
                    location,
                    owner,
                    status,
                    description,
                },
            ),
            RegistryCommands::DeprecateNamespace { namespace } => {
                commands::registry::run_deprecate_namespace(&global, namespace)
            }
            RegistryCommands::DeprecateUrn { urn } => {
                commands::registry::run_deprecate_urn(&global, urn)
            }
        },

        Commands::Spec { command } => match command {
            SpecCommands::Check => commands::spec::run_check(&global),
        },

        Commands::Init { path } => commands::init::run(&global, path),
    }
}
