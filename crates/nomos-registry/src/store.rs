//! In-memory registry state with JSONL persistence.
//!
//! Entries keep file order. Loading never rejects duplicate keys: lookups
//! report them as [`Lookup::Duplicate`] so validators can flag the data
//! integrity problem for that key without failing the whole run.

use crate::entry::{EntryStatus, NamespaceEntry, UrnEntry};
use crate::error::RegistryError;
use crate::jsonl::{read_entries_from_path, write_entries_to_path};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const NAMESPACES_FILE: &str = "namespaces.jsonl";
pub const URNS_FILE: &str = "urns.jsonl";

fn existing_file(dir: &Path, name: &str, kind: RegistryKind) -> Result<PathBuf, RegistryError> {
    let path = dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(RegistryError::Missing {
            kind,
            path: path.display().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    Namespace,
    Urn,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegistryKind::Namespace => "namespace",
            RegistryKind::Urn => "urn",
        })
    }
}

/// Result of a keyed registry lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    Missing,
    Unique(&'a T),
    Duplicate(Vec<&'a T>),
}

impl<'a, T> Lookup<'a, T> {
    fn from_matches(mut matches: Vec<&'a T>) -> Self {
        match matches.len() {
            0 => Lookup::Missing,
            1 => Lookup::Unique(matches.remove(0)),
            _ => Lookup::Duplicate(matches),
        }
    }

    pub fn unique(&self) -> Option<&'a T> {
        match self {
            Lookup::Unique(entry) => Some(*entry),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }
}

/// A key registered more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub kind: RegistryKind,
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RegistryStore {
    namespaces: Vec<NamespaceEntry>,
    urns: Vec<UrnEntry>,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(namespaces: Vec<NamespaceEntry>, urns: Vec<UrnEntry>) -> Self {
        Self { namespaces, urns }
    }

    /// Load `namespaces.jsonl` and `urns.jsonl` from `dir`. Both files must
    /// exist; an empty registry is an empty file.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let namespaces_path = existing_file(dir, NAMESPACES_FILE, RegistryKind::Namespace)?;
        let urns_path = existing_file(dir, URNS_FILE, RegistryKind::Urn)?;
        let namespaces: Vec<NamespaceEntry> = read_entries_from_path(namespaces_path)?;
        let urns: Vec<UrnEntry> = read_entries_from_path(urns_path)?;
        tracing::debug!(
            dir = %dir.display(),
            namespaces = namespaces.len(),
            urns = urns.len(),
            "loaded registries"
        );
        Ok(Self { namespaces, urns })
    }

    /// Atomically rewrite both registry files under `dir`.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), RegistryError> {
        let dir = dir.as_ref();
        write_entries_to_path(dir.join(NAMESPACES_FILE), &self.namespaces)?;
        write_entries_to_path(dir.join(URNS_FILE), &self.urns)?;
        Ok(())
    }

    pub fn namespaces(&self) -> &[NamespaceEntry] {
        &self.namespaces
    }

    pub fn urns(&self) -> &[UrnEntry] {
        &self.urns
    }

    pub fn namespace(&self, namespace: &str) -> Lookup<'_, NamespaceEntry> {
        Lookup::from_matches(
            self.namespaces
                .iter()
                .filter(|entry| entry.namespace == namespace)
                .collect(),
        )
    }

    pub fn urn(&self, urn: &str) -> Lookup<'_, UrnEntry> {
        Lookup::from_matches(self.urns.iter().filter(|entry| entry.urn == urn).collect())
    }

    pub fn insert_namespace(&mut self, entry: NamespaceEntry) -> Result<(), RegistryError> {
        if !self.namespace(&entry.namespace).is_missing() {
            return Err(RegistryError::AlreadyRegistered {
                kind: RegistryKind::Namespace,
                key: entry.namespace,
            });
        }
        self.namespaces.push(entry);
        Ok(())
    }

    pub fn insert_urn(&mut self, entry: UrnEntry) -> Result<(), RegistryError> {
        if !self.urn(&entry.urn).is_missing() {
            return Err(RegistryError::AlreadyRegistered {
                kind: RegistryKind::Urn,
                key: entry.urn,
            });
        }
        self.urns.push(entry);
        Ok(())
    }

    /// Move a namespace between `active` and `deprecated`.
    ///
    /// Returns `false` when the entry already had `status`.
    pub fn set_namespace_status(
        &mut self,
        namespace: &str,
        status: EntryStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, RegistryError> {
        let index = unique_index(
            RegistryKind::Namespace,
            namespace,
            self.namespaces.iter().map(|entry| entry.namespace.as_str()),
        )?;
        let entry = &mut self.namespaces[index];
        let changed = transition(RegistryKind::Namespace, namespace, entry.status, status)?;
        if changed {
            entry.status = status;
            entry.updated = Some(at);
        }
        Ok(changed)
    }

    pub fn set_urn_status(
        &mut self,
        urn: &str,
        status: EntryStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, RegistryError> {
        let index = unique_index(
            RegistryKind::Urn,
            urn,
            self.urns.iter().map(|entry| entry.urn.as_str()),
        )?;
        let entry = &mut self.urns[index];
        let changed = transition(RegistryKind::Urn, urn, entry.status, status)?;
        if changed {
            entry.status = status;
            entry.updated = Some(at);
        }
        Ok(changed)
    }

    /// Every key registered more than once, namespaces first, in key order.
    pub fn duplicate_keys(&self) -> Vec<DuplicateKey> {
        let mut out = duplicates(
            RegistryKind::Namespace,
            self.namespaces.iter().map(|e| e.namespace.as_str()),
        );
        out.extend(duplicates(
            RegistryKind::Urn,
            self.urns.iter().map(|e| e.urn.as_str()),
        ));
        out
    }
}

fn unique_index<'a>(
    kind: RegistryKind,
    key: &str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<usize, RegistryError> {
    let hits: Vec<usize> = keys
        .enumerate()
        .filter(|(_, candidate)| *candidate == key)
        .map(|(index, _)| index)
        .collect();
    match hits.as_slice() {
        [] => Err(RegistryError::NotFound {
            kind,
            key: key.to_string(),
        }),
        [index] => Ok(*index),
        _ => Err(RegistryError::Duplicate {
            kind,
            key: key.to_string(),
            count: hits.len(),
        }),
    }
}

fn transition(
    kind: RegistryKind,
    key: &str,
    from: EntryStatus,
    to: EntryStatus,
) -> Result<bool, RegistryError> {
    match (from, to) {
        (EntryStatus::Reserved, _) => Err(RegistryError::ReservedImmutable {
            kind,
            key: key.to_string(),
        }),
        (_, EntryStatus::Reserved) => Err(RegistryError::InvalidTransition {
            kind,
            key: key.to_string(),
            to,
        }),
        (from, to) => Ok(from != to),
    }
}

fn duplicates<'a>(kind: RegistryKind, keys: impl Iterator<Item = &'a str>) -> Vec<DuplicateKey> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, count)| DuplicateKey {
            kind,
            key: key.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RegistryStore {
        RegistryStore::from_entries(
            vec![
                NamespaceEntry::new("acme", "platform"),
                NamespaceEntry::new("acme.core", "platform"),
                NamespaceEntry::new("system", "governance").with_status(EntryStatus::Reserved),
            ],
            vec![
                UrnEntry::new("urn:acme:module:core", "workspace/core", "platform"),
                UrnEntry::new("urn:acme:module:dup", "a", "platform"),
                UrnEntry::new("urn:acme:module:dup", "b", "platform"),
            ],
        )
    }

    #[test]
    fn lookups_distinguish_missing_unique_and_duplicate() {
        let store = store();
        assert!(store.namespace("acme.tools").is_missing());
        assert_eq!(
            store.namespace("acme.core").unique().map(|e| e.owner.as_str()),
            Some("platform")
        );
        match store.urn("urn:acme:module:dup") {
            Lookup::Duplicate(entries) => assert_eq!(entries.len(), 2),
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[test]
    fn insert_rejects_existing_keys() {
        let mut store = store();
        let err = store
            .insert_namespace(NamespaceEntry::new("acme", "someone"))
            .expect_err("duplicate insert");
        assert!(matches!(err, RegistryError::AlreadyRegistered { .. }));
        store
            .insert_urn(UrnEntry::new("urn:acme:module:new", "x", "platform"))
            .expect("new urn");
        assert_eq!(store.urns().len(), 4);
    }

    #[test]
    fn deprecation_round_trips_and_stamps_updated() {
        let mut store = store();
        let at = Utc::now();
        assert!(store
            .set_namespace_status("acme.core", EntryStatus::Deprecated, at)
            .expect("deprecate"));
        assert!(!store
            .set_namespace_status("acme.core", EntryStatus::Deprecated, at)
            .expect("no-op"));
        let entry = store.namespace("acme.core").unique().expect("entry").clone();
        assert_eq!(entry.status, EntryStatus::Deprecated);
        assert_eq!(entry.updated, Some(at));
        assert!(store
            .set_namespace_status("acme.core", EntryStatus::Active, at)
            .expect("reactivate"));
    }

    #[test]
    fn reserved_entries_never_transition() {
        let mut store = store();
        let err = store
            .set_namespace_status("system", EntryStatus::Deprecated, Utc::now())
            .expect_err("reserved");
        assert!(matches!(err, RegistryError::ReservedImmutable { .. }));
        let err = store
            .set_namespace_status("acme", EntryStatus::Reserved, Utc::now())
            .expect_err("cannot reserve");
        assert!(matches!(err, RegistryError::InvalidTransition { .. }));
    }

    #[test]
    fn status_change_on_duplicate_key_is_refused() {
        let mut store = store();
        let err = store
            .set_urn_status("urn:acme:module:dup", EntryStatus::Deprecated, Utc::now())
            .expect_err("ambiguous");
        assert!(matches!(err, RegistryError::Duplicate { count: 2, .. }));
    }

    #[test]
    fn duplicate_keys_are_reported() {
        let dups = store().duplicate_keys();
        assert_eq!(
            dups,
            vec![DuplicateKey {
                kind: RegistryKind::Urn,
                key: "urn:acme:module:dup".to_string(),
                count: 2,
            }]
        );
    }
}
