//! The loaded, immutable set of four specification documents.

use crate::document::SpecDocument;
use crate::error::SpecError;
use crate::naming::NamingSpec;
use crate::namespace::NamespaceSpec;
use crate::paths::PathSpec;
use crate::urn::UrnSpec;
use crate::vocabulary::RuleCategory;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

const BUILTIN_NAMING: &str = include_str!("../specs/naming.toml");
const BUILTIN_NAMESPACE: &str = include_str!("../specs/namespace.toml");
const BUILTIN_URN: &str = include_str!("../specs/urn.toml");
const BUILTIN_PATHS: &str = include_str!("../specs/paths.toml");

#[derive(Debug, Clone)]
pub struct SpecStore {
    pub naming: NamingSpec,
    pub namespace: NamespaceSpec,
    pub urn: UrnSpec,
    pub paths: PathSpec,
}

impl SpecStore {
    /// Load `naming.toml`, `namespace.toml`, `urn.toml` and `paths.toml`
    /// from `dir`. Any missing or invalid document aborts the load.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SpecError> {
        let dir = dir.as_ref();
        let (naming_label, naming) = read_document(dir, RuleCategory::Naming)?;
        let (namespace_label, namespace) = read_document(dir, RuleCategory::Namespace)?;
        let (urn_label, urn) = read_document(dir, RuleCategory::Urn)?;
        let (paths_label, paths) = read_document(dir, RuleCategory::Paths)?;
        Self::from_sources(
            (&naming_label, &naming),
            (&namespace_label, &namespace),
            (&urn_label, &urn),
            (&paths_label, &paths),
        )
    }

    /// The rule set shipped with this crate.
    pub fn builtin() -> Result<Self, SpecError> {
        let label = |category: RuleCategory| format!("<builtin>/{}", category.document_file_name());
        Self::from_sources(
            (&label(RuleCategory::Naming), BUILTIN_NAMING),
            (&label(RuleCategory::Namespace), BUILTIN_NAMESPACE),
            (&label(RuleCategory::Urn), BUILTIN_URN),
            (&label(RuleCategory::Paths), BUILTIN_PATHS),
        )
    }

    /// Raw TOML of the shipped documents, keyed by category. Used to scaffold
    /// a fresh workspace.
    pub fn builtin_documents() -> [(RuleCategory, &'static str); 4] {
        [
            (RuleCategory::Naming, BUILTIN_NAMING),
            (RuleCategory::Namespace, BUILTIN_NAMESPACE),
            (RuleCategory::Urn, BUILTIN_URN),
            (RuleCategory::Paths, BUILTIN_PATHS),
        ]
    }

    /// Build a store from `(label, toml)` pairs, one per category.
    pub fn from_sources(
        naming: (&str, &str),
        namespace: (&str, &str),
        urn: (&str, &str),
        paths: (&str, &str),
    ) -> Result<Self, SpecError> {
        Ok(Self {
            naming: NamingSpec::from_document(parse_document(naming, RuleCategory::Naming)?)?,
            namespace: NamespaceSpec::from_document(parse_document(
                namespace,
                RuleCategory::Namespace,
            )?)?,
            urn: UrnSpec::from_document(parse_document(urn, RuleCategory::Urn)?)?,
            paths: PathSpec::from_document(parse_document(paths, RuleCategory::Paths)?)?,
        })
    }

    pub fn format_version(&self, category: RuleCategory) -> &str {
        match category {
            RuleCategory::Naming => &self.naming.format_version,
            RuleCategory::Namespace => &self.namespace.format_version,
            RuleCategory::Urn => &self.urn.format_version,
            RuleCategory::Paths => &self.paths.format_version,
        }
    }

    /// `category -> format_version`, recorded in evidence.
    pub fn versions(&self) -> BTreeMap<String, String> {
        RuleCategory::ALL
            .into_iter()
            .map(|category| {
                (
                    category.as_str().to_string(),
                    self.format_version(category).to_string(),
                )
            })
            .collect()
    }
}

fn read_document(dir: &Path, category: RuleCategory) -> Result<(String, String), SpecError> {
    let path = dir.join(category.document_file_name());
    let label = path.display().to_string();
    if !path.is_file() {
        return Err(SpecError::Missing { path: label });
    }
    let text = std::fs::read_to_string(&path).map_err(|source| SpecError::ReadFile {
        path: label.clone(),
        source,
    })?;
    Ok((label, text))
}

fn parse_document<S: DeserializeOwned + Default>(
    (label, text): (&str, &str),
    expected: RuleCategory,
) -> Result<SpecDocument<S>, SpecError> {
    let doc: SpecDocument<S> = toml::from_str(text).map_err(|source| SpecError::ParseToml {
        path: label.to_string(),
        source,
    })?;
    if doc.category != expected {
        return Err(SpecError::CategoryMismatch {
            path: label.to_string(),
            expected,
            found: doc.category,
        });
    }
    Ok(doc)
}
