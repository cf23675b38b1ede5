use clap::{Args, Parser, Subcommand, ValueEnum};
use nomos_registry::{EntryStatus, Visibility};
use nomos_spec::{PathOperation, TargetType, WritePolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nomos",
    about = "Nomos: naming, namespace, URN, and path governance checks",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Workspace root (default: nearest ancestor with nomos.toml or .git)
    #[arg(long, global = true, env = "NOMOS_ROOT")]
    pub root: Option<PathBuf>,

    /// Config file, relative to the workspace root (default: nomos.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter written to stderr, e.g. `info` or `nomos_kernel=debug`
    #[arg(long, global = true, env = "NOMOS_LOG")]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate targets against the specification
    Validate {
        #[command(subcommand)]
        command: ValidateCommands,
    },

    /// Resolve a registered URN to its storage location
    Resolve {
        /// URN to resolve
        urn: String,
    },

    /// Inspect or change the namespace and URN registries
    Registry {
        #[command(subcommand)]
        command: RegistryCommands,
    },

    /// Specification document tools
    Spec {
        #[command(subcommand)]
        command: SpecCommands,
    },

    /// Scaffold a workspace: config, specifications, empty registries
    Init {
        /// Directory to initialize (default: --root or the current directory)
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ValidateCommands {
    /// Orchestrated run over the manifest, changed files, and registry
    All {
        /// Changed file to check (repeatable)
        #[arg(long = "changed-file")]
        changed_files: Vec<String>,

        /// File listing changed paths, one per line
        #[arg(long)]
        changed_files_list: Option<PathBuf>,

        /// Skip registry entries as targets
        #[arg(long)]
        no_registry: bool,

        /// Skip the targets manifest
        #[arg(long)]
        no_manifest: bool,

        /// Worker threads (default from config)
        #[arg(long)]
        jobs: Option<usize>,

        /// Do not write evidence artifacts
        #[arg(long)]
        no_evidence: bool,

        /// Check that registered directories and locations exist (default from config)
        #[arg(long)]
        check_references: bool,
    },

    /// Validate one name against the naming rules
    Naming {
        /// Value to check
        target: String,

        /// file, directory, identifier, version, or urn_fragment
        target_type: TargetType,
    },

    /// Validate a namespace
    Namespace {
        namespace: String,

        /// Also check registry existence, status, parent, and directory
        #[arg(long)]
        check_registration: bool,
    },

    /// Validate a URN
    Urn {
        urn: String,

        /// Also require exactly one registry entry
        #[arg(long)]
        check_registration: bool,
    },

    /// Resolve a path's write policy and check an operation against it
    Path {
        path: String,

        /// read, create, modify, or delete
        #[arg(long)]
        operation: Option<PathOperation>,

        /// Fail writes that conflict with the resolved policy
        #[arg(long)]
        check_write_policy: bool,

        /// The write to a restricted path has been approved
        #[arg(long)]
        approved: bool,

        /// Policy the caller expects the path to resolve to
        #[arg(long)]
        declared_policy: Option<WritePolicy>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum RegistryKindArg {
    Namespace,
    Urn,
}

#[derive(Subcommand, Clone, Debug)]
pub enum RegistryCommands {
    /// List registry entries
    List {
        /// Only one registry
        #[arg(long, value_enum)]
        kind: Option<RegistryKindArg>,

        /// Only entries with this status
        #[arg(long)]
        status: Option<EntryStatus>,
    },

    /// Register a namespace
    AddNamespace {
        namespace: String,

        #[arg(long)]
        owner: String,

        /// Repository directory the namespace maps to
        #[arg(long)]
        directory: Option<String>,

        #[arg(long, default_value = "internal")]
        visibility: Visibility,

        #[arg(long, default_value = "writable")]
        write_policy: WritePolicy,

        /// active or reserved
        #[arg(long, default_value = "active")]
        status: EntryStatus,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Register a URN
    AddUrn {
        urn: String,

        /// Storage location the URN resolves to
        #[arg(long)]
        location: String,

        #[arg(long)]
        owner: String,

        #[arg(long, default_value = "active")]
        status: EntryStatus,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Mark a namespace deprecated
    DeprecateNamespace { namespace: String },

    /// Mark a URN deprecated
    DeprecateUrn { urn: String },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SpecCommands {
    /// Run every rule example and vector through the validators
    Check,
}
