//! The closed set of things the orchestrator can validate, and the sources
//! a target list is assembled from.

use crate::error::NomosError;
use crate::path::{PathCheck, normalize_path};
use nomos_registry::{EntryStatus, RegistryStore};
use nomos_spec::{PathOperation, TargetType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Naming {
        value: String,
        target_type: TargetType,
    },
    Namespace {
        value: String,
        #[serde(default)]
        check_registration: bool,
    },
    Urn {
        value: String,
        #[serde(default)]
        check_registration: bool,
    },
    Path(PathCheck),
    /// A registry key and the location it records, checked on disk.
    Reference { value: String, location: String },
}

impl Target {
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Naming { .. } => "naming",
            Target::Namespace { .. } => "namespace",
            Target::Urn { .. } => "urn",
            Target::Path(_) => "path",
            Target::Reference { .. } => "reference",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Target::Naming { value, .. }
            | Target::Namespace { value, .. }
            | Target::Urn { value, .. }
            | Target::Reference { value, .. } => value,
            Target::Path(check) => &check.value,
        }
    }

    /// Short qualifier shown next to the value in reports.
    pub fn qualifier(&self) -> String {
        match self {
            Target::Naming { target_type, .. } => target_type.to_string(),
            Target::Namespace {
                check_registration, ..
            }
            | Target::Urn {
                check_registration, ..
            } => {
                if *check_registration {
                    "registered".to_string()
                } else {
                    "syntax".to_string()
                }
            }
            Target::Path(check) => {
                if check.check_write_policy {
                    check.operation.to_string()
                } else {
                    "policy".to_string()
                }
            }
            Target::Reference { location, .. } => location.clone(),
        }
    }
}

/// `nomos.targets.toml`: an explicit list of `[[targets]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetManifest {
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl TargetManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NomosError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| NomosError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| NomosError::ParseToml {
            path: path.display().to_string(),
            source,
        })
    }
}

/// A changed file becomes a write-checked path target plus naming targets
/// for its file name and each directory component.
pub fn changed_file_targets(raw: &str) -> Vec<Target> {
    let mut targets = vec![Target::Path(
        PathCheck::new(raw).writing(PathOperation::Modify),
    )];
    let Ok(normalized) = normalize_path(raw) else {
        return targets;
    };
    let components: Vec<&str> = normalized.split('/').collect();
    if let Some((file, dirs)) = components.split_last() {
        for dir in dirs {
            targets.push(Target::Naming {
                value: (*dir).to_string(),
                target_type: TargetType::Directory,
            });
        }
        targets.push(Target::Naming {
            value: (*file).to_string(),
            target_type: TargetType::File,
        });
    }
    targets
}

/// Registration-checked targets for every active registry entry.
pub fn registry_targets(registry: &RegistryStore) -> Vec<Target> {
    let namespaces = registry
        .namespaces()
        .iter()
        .filter(|entry| entry.status == EntryStatus::Active)
        .map(|entry| Target::Namespace {
            value: entry.namespace.clone(),
            check_registration: true,
        });
    let urns = registry
        .urns()
        .iter()
        .filter(|entry| entry.status == EntryStatus::Active)
        .map(|entry| Target::Urn {
            value: entry.urn.clone(),
            check_registration: true,
        });
    // Duplicate keys yield one target; the validator reports the duplication.
    let mut seen = BTreeSet::new();
    namespaces
        .chain(urns)
        .filter(|target| seen.insert((target.kind(), target.value().to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomos_registry::{NamespaceEntry, UrnEntry};

    #[test]
    fn manifest_targets_are_tagged_by_kind() {
        let manifest: TargetManifest = toml::from_str(
            r#"
[[targets]]
kind = "naming"
value = "root.config.yaml"
target_type = "file"

[[targets]]
kind = "namespace"
value = "machinenativeops.core"

[[targets]]
kind = "path"
value = "controlplane/baseline/x.toml"
operation = "delete"
check_write_policy = true
"#,
        )
        .expect("manifest parses");
        assert_eq!(manifest.targets.len(), 3);
        assert_eq!(manifest.targets[1].kind(), "namespace");
        match &manifest.targets[2] {
            Target::Path(check) => {
                assert_eq!(check.operation, PathOperation::Delete);
                assert!(check.check_write_policy);
                assert!(!check.approved);
            }
            other => panic!("expected path target, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = toml::from_str::<TargetManifest>(
            "[[targets]]\nkind = \"device\"\nvalue = \"x\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn changed_file_expands_into_path_and_naming_targets() {
        let targets = changed_file_targets("./workspace/core-tools/main.rs");
        let kinds: Vec<(&str, &str)> = targets.iter().map(|t| (t.kind(), t.value())).collect();
        assert_eq!(
            kinds,
            vec![
                ("path", "./workspace/core-tools/main.rs"),
                ("naming", "workspace"),
                ("naming", "core-tools"),
                ("naming", "main.rs"),
            ]
        );
    }

    #[test]
    fn unparseable_changed_file_is_only_a_path_target() {
        assert_eq!(changed_file_targets("../escape.txt").len(), 1);
    }

    #[test]
    fn only_active_registry_entries_become_targets() {
        let registry = RegistryStore::from_entries(
            vec![
                NamespaceEntry::new("acme", "a"),
                NamespaceEntry::new("acme.old", "a").with_status(EntryStatus::Deprecated),
                NamespaceEntry::new("system", "g").with_status(EntryStatus::Reserved),
            ],
            vec![UrnEntry::new("urn:acme:module:core", "x", "a")],
        );
        let targets = registry_targets(&registry);
        let values: Vec<&str> = targets.iter().map(Target::value).collect();
        assert_eq!(values, vec!["acme", "urn:acme:module:core"]);
    }
}
