use nomos_spec::{RuleCategory, SpecError, SpecStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard(PathBuf);

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn write_builtin(dir: &Path) {
    for (category, text) in SpecStore::builtin_documents() {
        fs::write(dir.join(category.document_file_name()), text).expect("write spec");
    }
}

#[test]
fn directory_with_builtin_documents_loads() {
    let tmp = TempDirGuard::new("nomos-spec-load");
    write_builtin(tmp.path());

    let store = SpecStore::load(tmp.path()).expect("specs load from directory");
    let builtin = SpecStore::builtin().expect("builtin");
    assert_eq!(store.versions(), builtin.versions());
    assert_eq!(store.paths.rules.len(), builtin.paths.rules.len());
}

#[test]
fn missing_document_is_fatal() {
    let tmp = TempDirGuard::new("nomos-spec-missing");
    write_builtin(tmp.path());
    fs::remove_file(tmp.path().join(RuleCategory::Urn.document_file_name())).expect("remove");

    let err = SpecStore::load(tmp.path()).expect_err("urn.toml is missing");
    match err {
        SpecError::Missing { path } => assert!(path.ends_with("urn.toml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_pattern_names_the_rule() {
    let tmp = TempDirGuard::new("nomos-spec-pattern");
    write_builtin(tmp.path());
    let naming = fs::read_to_string(tmp.path().join("naming.toml")).expect("read");
    let broken = naming.replace(
        r"^v(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)$",
        r"^v(0|[1-9",
    );
    assert_ne!(naming, broken);
    fs::write(tmp.path().join("naming.toml"), broken).expect("write");

    let err = SpecStore::load(tmp.path()).expect_err("pattern does not compile");
    match err {
        SpecError::InvalidPattern { category, rule, .. } => {
            assert_eq!(category, RuleCategory::Naming);
            assert_eq!(rule, "version");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn builtin_examples_are_present_for_every_rule() {
    let store = SpecStore::builtin().expect("builtin");
    for rule in &store.naming.rules {
        assert!(!rule.examples.is_empty(), "naming rule {} has no examples", rule.name);
    }
    for rule in &store.paths.rules {
        assert!(!rule.rule.examples.is_empty(), "path rule {} has no examples", rule.rule.name);
    }
}
