use crate::jsonl::JsonlError;
use crate::store::RegistryKind;
use crate::entry::EntryStatus;

/// Errors raised while loading, mutating, or persisting registries.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("{kind} registry not found: {path} (run `nomos init` to create empty registries)")]
    Missing { kind: RegistryKind, path: String },

    #[error("{kind} `{key}` is already registered")]
    AlreadyRegistered { kind: RegistryKind, key: String },

    #[error("{kind} `{key}` is not registered")]
    NotFound { kind: RegistryKind, key: String },

    #[error("{kind} `{key}` has {count} registry entries")]
    Duplicate {
        kind: RegistryKind,
        key: String,
        count: usize,
    },

    #[error("{kind} `{key}` is reserved and cannot change status")]
    ReservedImmutable { kind: RegistryKind, key: String },

    #[error("{kind} `{key}` cannot transition to `{to}`")]
    InvalidTransition {
        kind: RegistryKind,
        key: String,
        to: EntryStatus,
    },
}
