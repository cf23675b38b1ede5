//! Reference integrity: registered directories and storage locations must
//! exist under the workspace root.
//!
//! Opt-in for `validate all`; a registry can be checked without the tree it
//! describes being present.

use crate::context::ValidationContext;
use crate::outcome::{CheckOutcome, IssueClass, rule_id};
use crate::path::normalize_path;
use crate::target::Target;
use nomos_registry::{EntryStatus, RegistryStore};
use std::collections::BTreeSet;

/// Check that `location`, recorded for registry key `key`, exists.
pub fn check_reference(ctx: &ValidationContext<'_>, key: &str, location: &str) -> CheckOutcome {
    let mut out = CheckOutcome::new();
    let path = match normalize_path(location) {
        Ok(path) => path,
        Err(message) => {
            out.error(
                rule_id::REFERENCE_LOCATION,
                IssueClass::Parse,
                format!("`{key}` location: {message}"),
            );
            return out;
        }
    };
    let Some(root) = ctx.root else {
        out.error(
            rule_id::REFERENCE_LOCATION,
            IssueClass::Registration,
            format!("`{key}` references `{path}` but no workspace root is known"),
        );
        return out;
    };
    if !root.join(&path).exists() {
        out.error(
            rule_id::REFERENCE_LOCATION,
            IssueClass::Registration,
            format!("`{key}` references `{path}`, which does not exist in the workspace"),
        );
    }
    out
}

/// Reference targets for every active namespace with a directory mapping
/// and every active URN.
pub fn reference_targets(registry: &RegistryStore) -> Vec<Target> {
    let namespaces = registry
        .namespaces()
        .iter()
        .filter(|entry| entry.status == EntryStatus::Active)
        .filter_map(|entry| {
            let directory = entry.directory.as_ref()?;
            Some(Target::Reference {
                value: entry.namespace.clone(),
                location: directory.clone(),
            })
        });
    let urns = registry
        .urns()
        .iter()
        .filter(|entry| entry.status == EntryStatus::Active)
        .map(|entry| Target::Reference {
            value: entry.urn.clone(),
            location: entry.location.clone(),
        });
    let mut seen = BTreeSet::new();
    namespaces
        .chain(urns)
        .filter(|target| seen.insert((target.value().to_string(), target.qualifier())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use nomos_registry::{NamespaceEntry, UrnEntry};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempDirGuard(PathBuf);

    impl TempDirGuard {
        fn new(prefix: &str) -> Self {
            let unique = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "nomos-reference-{prefix}-{}-{unique}",
                std::process::id()
            ));
            fs::create_dir_all(&path).expect("temp dir should exist");
            Self(path)
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn existing_and_missing_locations() {
        let tmp = TempDirGuard::new("exists");
        fs::create_dir_all(tmp.0.join("workspace/core")).expect("dirs");
        let fx = Fixture::builtin();
        let ctx = fx.ctx().with_root(&tmp.0);

        assert!(check_reference(&ctx, "acme", "./workspace/core/").ok());

        let out = check_reference(&ctx, "urn:acme:module:x", "workspace/gone");
        assert!(out.has_error(rule_id::REFERENCE_LOCATION));
        assert_eq!(out.errors[0].class, IssueClass::Registration);
        assert!(out.errors[0].message.contains("workspace/gone"));
    }

    #[test]
    fn escaping_location_is_a_parse_error() {
        let tmp = TempDirGuard::new("escape");
        let fx = Fixture::builtin();
        let ctx = fx.ctx().with_root(&tmp.0);
        let out = check_reference(&ctx, "acme", "../outside");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].class, IssueClass::Parse);
    }

    #[test]
    fn without_a_root_every_reference_fails() {
        let fx = Fixture::builtin();
        let out = check_reference(&fx.ctx(), "acme", "workspace");
        assert!(out.has_error(rule_id::REFERENCE_LOCATION));
    }

    #[test]
    fn targets_cover_active_entries_with_locations() {
        let registry = RegistryStore::from_entries(
            vec![
                NamespaceEntry::new("acme", "a").with_directory("workspace/acme"),
                NamespaceEntry::new("acme.bare", "a"),
                NamespaceEntry::new("acme.old", "a")
                    .with_directory("workspace/acme/old")
                    .with_status(EntryStatus::Deprecated),
            ],
            vec![
                UrnEntry::new("urn:acme:module:core", "workspace/acme/core", "a"),
                UrnEntry::new("urn:acme:module:core", "workspace/acme/core", "b"),
            ],
        );
        let targets = reference_targets(&registry);
        let pairs: Vec<(&str, String)> = targets
            .iter()
            .map(|t| (t.value(), t.qualifier()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("acme", "workspace/acme".to_string()),
                ("urn:acme:module:core", "workspace/acme/core".to_string()),
            ]
        );
    }
}
