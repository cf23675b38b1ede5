//! # Nomos specification store
//!
//! Versioned rule documents for the four governed surfaces of a repository:
//!
//! ```text
//! naming.toml      ← file / directory / identifier / version / urn_fragment
//! namespace.toml   ← separator, depth, reserved tokens, root segment
//! urn.toml         ← scheme, declared resource types, registration severity
//! paths.toml       ← ordered path → write-policy rules, root areas
//! ```
//!
//! Documents are loaded once per run and never mutated. Loading compiles
//! every pattern and rejects inconsistent documents, so a store that exists
//! is a store the validators can trust.

pub mod document;
pub mod error;
pub mod namespace;
pub mod naming;
pub mod paths;
pub mod store;
pub mod urn;
pub mod vocabulary;

pub use document::{Expectation, PatternRule, RuleDoc, RuleExamples, SpecDocument, VectorDoc};
pub use error::SpecError;
pub use namespace::{NamespaceSettings, NamespaceSpec, ROOT_SEGMENT_RULE};
pub use naming::{NamingSettings, NamingSpec};
pub use paths::{PathRule, PathSettings, PathSpec, RootArea};
pub use store::SpecStore;
pub use urn::{Severity, UrnSettings, UrnSpec};
pub use vocabulary::{PathOperation, ResourceType, RuleCategory, TargetType, WritePolicy};
