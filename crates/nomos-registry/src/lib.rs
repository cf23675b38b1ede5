//! # Nomos registry store
//!
//! Persistent records of every namespace and URN actually allocated in a
//! repository. Two JSONL files live side by side:
//!
//! ```text
//! <registry dir>/namespaces.jsonl   ← NamespaceEntry per line
//! <registry dir>/urns.jsonl         ← UrnEntry per line
//! ```
//!
//! Entries are never deleted; deprecation is the deletion mechanism. This
//! crate does not validate values against the specification store; write
//! time validation happens in `nomos-kernel`'s registration module.

pub mod entry;
pub mod error;
pub mod jsonl;
pub mod store;

pub use entry::{EntryStatus, NamespaceEntry, UrnEntry, Visibility};
pub use error::RegistryError;
pub use jsonl::JsonlError;
pub use store::{DuplicateKey, Lookup, NAMESPACES_FILE, RegistryKind, RegistryStore, URNS_FILE};
