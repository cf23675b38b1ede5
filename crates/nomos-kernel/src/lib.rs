//! # Nomos Kernel
//!
//! Validators for naming, namespace, URN and path conventions, and the
//! orchestrator that turns a list of targets into an auditable report.
//!
//! Every validator is a pure function of its input and an explicit
//! [`ValidationContext`] borrowing the loaded specification and registry
//! stores. Findings are data, never errors: a validator returns a
//! [`CheckOutcome`] of error and warning diagnostics, and only load
//! failures surface as [`NomosError`].
//!
//! ## Architecture
//!
//! ```text
//! SpecStore + RegistryStore
//!     │
//! ValidationContext       ← borrowed, read-only for a whole run
//!     │
//! Target                  ← naming | namespace | urn | path | reference
//!     │
//! check_target            ← one exhaustive dispatch
//!     │
//! Orchestrator::run       ← fan out, isolate panics, merge in order
//!     │
//! ValidationReport        ← JSON + Markdown evidence, content-addressed
//! ```

pub mod context;
pub mod error;
pub mod evidence;
pub mod namespace;
pub mod naming;
pub mod orchestrator;
pub mod outcome;
pub mod path;
pub mod reference;
pub mod registration;
pub mod report;
pub mod selfcheck;
pub mod target;
pub mod urn;
pub mod witness;
pub mod workspace;

pub use context::ValidationContext;
pub use error::NomosError;
pub use evidence::{EvidencePaths, read_evidence, write_evidence};
pub use namespace::{SplitNamespace, split_namespace, validate_namespace};
pub use naming::validate_naming;
pub use orchestrator::{Orchestrator, check_target};
pub use outcome::{CheckOutcome, Diagnostic, IssueClass, rule_id};
pub use path::{
    PathCheck, PathResolution, check_path, is_strictly_within, normalize_path, resolve_path,
    validate_path,
};
pub use reference::{check_reference, reference_targets};
pub use registration::{deprecate_namespace, deprecate_urn, register_namespace, register_urn};
pub use report::{
    Finding, FindingOutcome, REPORT_KIND, REPORT_SCHEMA, ReportBuilder, Summary, TargetResult,
    ValidationReport, Verdict,
};
pub use selfcheck::{Mismatch, SelfCheckReport, selfcheck};
pub use target::{Target, TargetManifest, changed_file_targets, registry_targets};
pub use urn::{
    NotFoundError, NotFoundReason, ResourceLocation, Urn, UrnParseError, parse_urn, resolve_urn,
    validate_urn,
};
pub use witness::{FindingKey, compute_finding_id, content_digest};
pub use workspace::{CONFIG_FILE, Config, InitOutcome, Workspace, init, resolve_root};
