//! Registry files on disk: `namespaces.jsonl` and `urns.jsonl` each hold one
//! JSON-encoded entry per line.
//!
//! Hand-edited registries may carry blank lines and `#` comments; both are
//! ignored. A registry holding NUL bytes or invalid UTF-8 is corrupt and
//! never parsed. Saving stages the new entries in a sibling file and renames
//! it over the registry.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from JSONL operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("{path}: I/O error: {message}")]
    Io { path: String, message: String },

    #[error("{path}:{line}: parse error: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("{path}: corrupted registry: {reason}")]
    Corrupt { path: String, reason: String },
}

fn io_error(path: &Path, err: impl std::fmt::Display) -> JsonlError {
    JsonlError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Parse entries from a JSONL reader. `label` names the source in errors.
pub fn read_entries<T: DeserializeOwned>(
    label: &str,
    reader: impl BufRead,
) -> Result<Vec<T>, JsonlError> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io {
            path: label.to_string(),
            message: format!("line {}: {e}", index + 1),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = serde_json::from_str(trimmed).map_err(|e| JsonlError::Parse {
            path: label.to_string(),
            line: index + 1,
            message: e.to_string(),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

pub fn write_entries<T: Serialize>(
    writer: &mut impl Write,
    entries: &[T],
) -> Result<(), JsonlError> {
    for entry in entries {
        let line =
            serde_json::to_string(entry).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| JsonlError::Serialize(e.to_string()))?;
    }
    Ok(())
}

/// Read entries from a registry file. The file must exist.
pub fn read_entries_from_path<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<Vec<T>, JsonlError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    if let Some(reason) = corruption(&bytes) {
        return Err(JsonlError::Corrupt {
            path: path.display().to_string(),
            reason: reason.to_string(),
        });
    }
    read_entries(&path.display().to_string(), bytes.as_slice())
}

/// Replace a registry file with `entries`. Readers see either the old file
/// or the complete new one.
pub fn write_entries_to_path<T: Serialize>(
    path: impl AsRef<Path>,
    entries: &[T],
) -> Result<(), JsonlError> {
    let path = path.as_ref();
    let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    }

    let staged = staging_path(path);
    let committed = stage(&staged, entries).and_then(|()| {
        fs::rename(&staged, path).map_err(|e| io_error(path, e))
    });
    if let Err(error) = committed {
        let _ = fs::remove_file(&staged);
        return Err(error);
    }

    // Persist the rename itself.
    if let Some(dir) = dir {
        File::open(dir)
            .and_then(|handle| handle.sync_all())
            .map_err(|e| io_error(dir, e))?;
    }
    Ok(())
}

fn stage<T: Serialize>(staged: &Path, entries: &[T]) -> Result<(), JsonlError> {
    let file = File::create(staged).map_err(|e| io_error(staged, e))?;
    let mut writer = BufWriter::new(file);
    write_entries(&mut writer, entries)?;
    writer
        .into_inner()
        .map_err(|e| io_error(staged, e.error()))?
        .sync_all()
        .map_err(|e| io_error(staged, e))
}

/// `<file>.<pid>-<nanos>.staged` next to the registry file.
fn staging_path(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(format!(".{}-{nanos}.staged", std::process::id()));
    PathBuf::from(name)
}

fn corruption(bytes: &[u8]) -> Option<&'static str> {
    if bytes.contains(&0) {
        Some("contains NUL byte(s)")
    } else if std::str::from_utf8(bytes).is_err() {
        Some("contains non-UTF-8 byte sequence(s)")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        key: String,
    }

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "nomos-jsonl-{prefix}-{}-{unique}.jsonl",
            std::process::id()
        ))
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "# registry\n\n{\"key\":\"a\"}\n   \n{\"key\":\"b\"}\n";
        let rows: Vec<Row> = read_entries("inline", text.as_bytes()).expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].key, "b");
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let text = "{\"key\":\"a\"}\n{broken\n";
        let err = read_entries::<Row>("inline", text.as_bytes()).expect_err("broken line");
        match err {
            JsonlError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn nul_payload_is_corrupt() {
        let path = temp_path("nul");
        fs::write(&path, b"{\"key\":\"a\"}\n\0garbage").expect("fixture should write");
        let result = read_entries_from_path::<Row>(&path);
        match result {
            Err(JsonlError::Corrupt { reason, .. }) => assert!(reason.contains("NUL")),
            other => panic!("expected corrupt registry error, got {other:?}"),
        }
        let _ = fs::remove_file(path);
    }

    #[test]
    fn non_utf8_payload_is_corrupt() {
        let path = temp_path("non-utf8");
        fs::write(&path, [0xff, 0xfe, 0xfd]).expect("fixture should write");
        let result = read_entries_from_path::<Row>(&path);
        match result {
            Err(JsonlError::Corrupt { reason, .. }) => assert!(reason.contains("non-UTF-8")),
            other => panic!("expected corrupt registry error, got {other:?}"),
        }
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = read_entries_from_path::<Row>(temp_path("absent"));
        assert!(matches!(result, Err(JsonlError::Io { .. })), "{result:?}");
    }

    #[test]
    fn write_replaces_previous_contents() {
        let path = temp_path("atomic-write");
        write_entries_to_path(&path, &[Row { key: "first".into() }]).expect("first write");
        write_entries_to_path(&path, &[Row { key: "second".into() }]).expect("second write");

        let text = fs::read_to_string(&path).expect("jsonl should exist");
        assert!(!text.contains("first"));
        assert!(text.contains("second"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn saving_leaves_no_staged_file_behind() {
        let path = temp_path("staged");
        write_entries_to_path(&path, &[Row { key: "only".into() }]).expect("write");
        let dir = path.parent().expect("temp parent");
        let name = path.file_name().expect("file name").to_string_lossy().to_string();
        let leftovers: Vec<_> = fs::read_dir(dir)
            .expect("list temp dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|entry| entry.starts_with(&name) && entry.ends_with(".staged"))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
        let _ = fs::remove_file(path);
    }
}
