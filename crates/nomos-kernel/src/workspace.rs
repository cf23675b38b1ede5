//! Workspace layout: `nomos.toml`, root discovery, and scaffolding.
//!
//! ```toml
//! [paths]
//! specs = "controlplane/baseline/specifications"
//! registry = "controlplane/baseline/registries"
//! evidence = "controlplane/overlay/evidence/validation"
//! targets = "nomos.targets.toml"
//!
//! [validation]
//! jobs = 1
//! include_registry = true
//! write_evidence = true
//! check_references = false
//! ```
//!
//! Every key is optional. Relative paths are resolved against the root.

use crate::error::NomosError;
use nomos_registry::{NAMESPACES_FILE, RegistryStore, URNS_FILE};
use nomos_spec::SpecStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "nomos.toml";

const DEFAULT_SPECS_DIR: &str = "controlplane/baseline/specifications";
const DEFAULT_REGISTRY_DIR: &str = "controlplane/baseline/registries";
const DEFAULT_EVIDENCE_DIR: &str = "controlplane/overlay/evidence/validation";
const DEFAULT_TARGETS_FILE: &str = "nomos.targets.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default = "default_specs")]
    pub specs: PathBuf,
    #[serde(default = "default_registry")]
    pub registry: PathBuf,
    #[serde(default = "default_evidence")]
    pub evidence: PathBuf,
    #[serde(default = "default_targets")]
    pub targets: PathBuf,
}

fn default_specs() -> PathBuf {
    PathBuf::from(DEFAULT_SPECS_DIR)
}

fn default_registry() -> PathBuf {
    PathBuf::from(DEFAULT_REGISTRY_DIR)
}

fn default_evidence() -> PathBuf {
    PathBuf::from(DEFAULT_EVIDENCE_DIR)
}

fn default_targets() -> PathBuf {
    PathBuf::from(DEFAULT_TARGETS_FILE)
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            specs: default_specs(),
            registry: default_registry(),
            evidence: default_evidence(),
            targets: default_targets(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    #[serde(default = "default_true")]
    pub include_registry: bool,
    #[serde(default = "default_true")]
    pub write_evidence: bool,
    /// Check that registered directories and locations exist on disk.
    #[serde(default)]
    pub check_references: bool,
}

fn default_jobs() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            include_registry: true,
            write_evidence: true,
            check_references: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NomosError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| NomosError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| NomosError::ParseToml {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Pick the workspace root: `explicit` if given, else the nearest ancestor
/// of `cwd` holding `nomos.toml` or `.git`, else `cwd` itself.
pub fn resolve_root(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(root) = explicit {
        return if root.is_absolute() {
            root.to_path_buf()
        } else {
            cwd.join(root)
        };
    }
    cwd.ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file() || dir.join(".git").exists())
        .unwrap_or(cwd)
        .to_path_buf()
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Load `config` (or `<root>/nomos.toml` when present, else defaults).
    pub fn load(root: impl Into<PathBuf>, config: Option<&Path>) -> Result<Self, NomosError> {
        let root = root.into();
        let config = match config {
            Some(path) => Config::load(root.join(path))?,
            None => {
                let default_path = root.join(CONFIG_FILE);
                if default_path.is_file() {
                    Config::load(&default_path)?
                } else {
                    Config::default()
                }
            }
        };
        tracing::debug!(root = %root.display(), "workspace loaded");
        Ok(Self { root, config })
    }

    pub fn specs_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.specs)
    }

    pub fn registry_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.registry)
    }

    pub fn evidence_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.evidence)
    }

    pub fn targets_path(&self) -> PathBuf {
        self.root.join(&self.config.paths.targets)
    }

    pub fn load_specs(&self) -> Result<SpecStore, NomosError> {
        Ok(SpecStore::load(self.specs_dir())?)
    }

    pub fn load_registry(&self) -> Result<RegistryStore, NomosError> {
        Ok(RegistryStore::load(self.registry_dir())?)
    }
}

const CONFIG_TEMPLATE: &str = r#"# nomos workspace configuration. Every key is optional.

[paths]
specs = "controlplane/baseline/specifications"
registry = "controlplane/baseline/registries"
evidence = "controlplane/overlay/evidence/validation"
targets = "nomos.targets.toml"

[validation]
jobs = 1
include_registry = true
write_evidence = true
check_references = false
"#;

const TARGETS_TEMPLATE: &str = r#"# Explicit targets for `nomos validate all`.
#
# [[targets]]
# kind = "naming"
# value = "root.config.yaml"
# target_type = "file"
#
# [[targets]]
# kind = "path"
# value = "controlplane/baseline/specifications/naming.toml"
# operation = "modify"
# check_write_policy = true
"#;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOutcome {
    pub root: PathBuf,
    pub created: Vec<PathBuf>,
    /// Files that already existed and were left alone.
    pub skipped: Vec<PathBuf>,
}

/// Scaffold a workspace at `root` with the default layout: config, shipped
/// specification documents, empty registries, and a targets template.
pub fn init(root: impl AsRef<Path>) -> Result<InitOutcome, NomosError> {
    let root = root.as_ref();
    let layout = PathsConfig::default();
    let mut files: Vec<(PathBuf, &str)> = vec![
        (root.join(CONFIG_FILE), CONFIG_TEMPLATE),
        (root.join(&layout.targets), TARGETS_TEMPLATE),
        (root.join(&layout.registry).join(NAMESPACES_FILE), ""),
        (root.join(&layout.registry).join(URNS_FILE), ""),
    ];
    for (category, text) in SpecStore::builtin_documents() {
        files.push((
            root.join(&layout.specs).join(category.document_file_name()),
            text,
        ));
    }

    let mut outcome = InitOutcome {
        root: root.to_path_buf(),
        ..InitOutcome::default()
    };
    for (path, text) in files {
        if path.exists() {
            outcome.skipped.push(path);
            continue;
        }
        write_new(&path, text)?;
        outcome.created.push(path);
    }
    let evidence = root.join(&layout.evidence);
    fs::create_dir_all(&evidence).map_err(|source| NomosError::WriteFile {
        path: evidence.display().to_string(),
        source,
    })?;
    tracing::info!(
        root = %root.display(),
        created = outcome.created.len(),
        skipped = outcome.skipped.len(),
        "workspace initialized"
    );
    Ok(outcome)
}

fn write_new(path: &Path, text: &str) -> Result<(), NomosError> {
    let write_err = |source| NomosError::WriteFile {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, text).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempDirGuard(PathBuf);

    impl TempDirGuard {
        fn new(prefix: &str) -> Self {
            let unique = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "nomos-workspace-{prefix}-{}-{unique}",
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
    fn partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[validation]\njobs = 4\n").expect("config");
        assert_eq!(config.validation.jobs, 4);
        assert!(config.validation.include_registry);
        assert!(!config.validation.check_references);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<Config>("[paths]\nspec = \"x\"\n").expect_err("typo");
        assert!(err.to_string().contains("spec"));
    }

    #[test]
    fn root_is_nearest_marked_ancestor() {
        let tmp = TempDirGuard::new("root");
        let nested = tmp.0.join("a/b");
        fs::create_dir_all(&nested).expect("nested dirs");
        fs::write(tmp.0.join(CONFIG_FILE), "").expect("config");
        assert_eq!(resolve_root(None, &nested), tmp.0);
        assert_eq!(resolve_root(Some(Path::new("a")), &tmp.0), tmp.0.join("a"));
    }

    #[test]
    fn init_scaffolds_a_loadable_workspace_and_is_rerunnable() {
        let tmp = TempDirGuard::new("init");
        let first = init(&tmp.0).expect("init");
        assert_eq!(first.created.len(), 8);
        assert!(first.skipped.is_empty());

        let ws = Workspace::load(&tmp.0, None).expect("workspace");
        let specs = ws.load_specs().expect("specs");
        assert_eq!(specs.versions().len(), 4);
        let registry = ws.load_registry().expect("registry");
        assert!(registry.namespaces().is_empty());
        assert!(ws.evidence_dir().is_dir());

        let second = init(&tmp.0).expect("second init");
        assert!(second.created.is_empty());
        assert_eq!(second.skipped.len(), 8);
    }

    #[test]
    fn missing_registry_is_a_load_failure() {
        let tmp = TempDirGuard::new("no-registry");
        init(&tmp.0).expect("init");
        let ws = Workspace::load(&tmp.0, None).expect("workspace");
        fs::remove_dir_all(ws.registry_dir()).expect("remove registries");

        let err = ws.load_registry().expect_err("registry is gone");
        assert!(err.is_load_failure());
        assert!(matches!(
            err,
            NomosError::Registry(nomos_registry::RegistryError::Missing { .. })
        ));

        let mut ws = ws;
        ws.config.paths.registry = PathBuf::from("controlplane/baseline/registry");
        let err = ws.load_registry().expect_err("mistyped registry dir");
        assert!(err.to_string().contains("controlplane/baseline/registry"));
    }

    #[test]
    fn explicit_config_path_is_resolved_against_root() {
        let tmp = TempDirGuard::new("config");
        fs::write(tmp.0.join("alt.toml"), "[paths]\nspecs = \"rules\"\n").expect("config");
        let ws = Workspace::load(&tmp.0, Some(Path::new("alt.toml"))).expect("workspace");
        assert_eq!(ws.specs_dir(), tmp.0.join("rules"));
        assert_eq!(ws.registry_dir(), tmp.0.join(DEFAULT_REGISTRY_DIR));
    }
}
