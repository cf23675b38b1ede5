//! Evidence artifacts: `<dir>/<run_id>.json` and `<dir>/<run_id>.md`.
//!
//! Artifacts are written once. An existing file with the same run id is an
//! error, never overwritten.

use crate::error::NomosError;
use crate::report::ValidationReport;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidencePaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

pub fn write_evidence(
    dir: impl AsRef<Path>,
    report: &ValidationReport,
) -> Result<EvidencePaths, NomosError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| NomosError::WriteFile {
        path: dir.display().to_string(),
        source,
    })?;

    let json_path = dir.join(format!("{}.json", report.run_id));
    let md_path = dir.join(format!("{}.md", report.run_id));
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    write_once(&json_path, json.as_bytes())?;
    write_once(&md_path, report.to_markdown().as_bytes())?;

    tracing::info!(
        json = %json_path.display(),
        markdown = %md_path.display(),
        "wrote evidence"
    );
    Ok(EvidencePaths {
        json: json_path,
        markdown: md_path,
    })
}

fn write_once(path: &Path, bytes: &[u8]) -> Result<(), NomosError> {
    let wrap = |source| NomosError::WriteFile {
        path: path.display().to_string(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| {
            if source.kind() == std::io::ErrorKind::AlreadyExists {
                NomosError::EvidenceExists {
                    path: path.display().to_string(),
                }
            } else {
                wrap(source)
            }
        })?;
    file.write_all(bytes).map_err(wrap)?;
    file.sync_all().map_err(wrap)?;
    Ok(())
}

/// Read a JSON evidence artifact back.
pub fn read_evidence(path: impl AsRef<Path>) -> Result<ValidationReport, NomosError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| NomosError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}
