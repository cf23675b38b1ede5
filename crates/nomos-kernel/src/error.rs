//! Errors that stop a kernel operation. Findings about targets are never
//! errors here; they are diagnostics inside a report.

use crate::outcome::Diagnostic;
use nomos_registry::RegistryError;
use nomos_spec::SpecError;

#[derive(Debug, thiserror::Error)]
pub enum NomosError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml in {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("evidence already exists: {path}")]
    EvidenceExists { path: String },

    #[error("{value} rejected: {}", render_diagnostics(.diagnostics))]
    Rejected {
        value: String,
        diagnostics: Vec<Diagnostic>,
    },
}

impl NomosError {
    pub(crate) fn rejected(value: &str, diagnostics: Vec<Diagnostic>) -> Self {
        Self::Rejected {
            value: value.to_string(),
            diagnostics,
        }
    }

    /// Load failures (specs, registries, config) abort a run before any
    /// target is checked.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            NomosError::Spec(_)
                | NomosError::Registry(_)
                | NomosError::ReadFile { .. }
                | NomosError::ParseToml { .. }
        )
    }
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
