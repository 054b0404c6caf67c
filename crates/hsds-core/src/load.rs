//! # JSON File Loading
//!
//! Turns files on disk into `serde_json::Value`s, classifying every failure
//! into a [`FileErrorKind`], and discovers `.json` files under a directory.
//!
//! Loading never panics and never aborts a batch: callers receive a
//! [`FileValidationError`] they can attach to the document's report entry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::error::Category;
use serde_json::Value;

use crate::error::{FileErrorKind, FileValidationError};

/// Directory and file names produced by operating systems and archivers
/// that never contain user data.
const SYSTEM_NAMES: &[&str] = &["__MACOSX", "Thumbs.db", "desktop.ini"];

/// Returns true if `path` names a system or hidden file or directory.
///
/// Hidden entries (leading `.`, which covers `.DS_Store` and AppleDouble
/// `._*` files) and the names in [`SYSTEM_NAMES`] are skipped.
pub fn is_system_file(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.starts_with('.') || SYSTEM_NAMES.contains(&name),
        None => false,
    }
}

/// Read and parse a JSON file.
///
/// # Errors
///
/// - `FILE_NOT_FOUND` if the file does not exist.
/// - `FILE_ACCESS_ERROR` if it cannot be read.
/// - `FILE_EMPTY` if it holds only whitespace.
/// - `ENCODING_ERROR` if it is not UTF-8.
/// - `INVALID_JSON` if the text is malformed or truncated.
/// - `JSON_PARSE_ERROR` for any other parser failure.
pub fn load_json_file(path: &Path) -> Result<Value, FileValidationError> {
    let display = path.display().to_string();

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            FileValidationError::new(FileErrorKind::FileNotFound, &display, "File not found")
        }
        ErrorKind::PermissionDenied => FileValidationError::new(
            FileErrorKind::FileAccessError,
            &display,
            "Permission denied reading file",
        ),
        _ => FileValidationError::new(
            FileErrorKind::FileAccessError,
            &display,
            format!("Cannot read file: {e}"),
        ),
    })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(FileValidationError::new(
            FileErrorKind::FileEmpty,
            &display,
            "File is empty",
        ));
    }

    let text = String::from_utf8(bytes).map_err(|e| {
        FileValidationError::new(
            FileErrorKind::EncodingError,
            &display,
            "File is not valid UTF-8",
        )
        .with_detail("position", e.utf8_error().valid_up_to())
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    serde_json::from_str(text).map_err(|e| {
        let kind = match e.classify() {
            Category::Syntax | Category::Eof => FileErrorKind::InvalidJson,
            Category::Data | Category::Io => FileErrorKind::JsonParseError,
        };
        FileValidationError::new(kind, &display, format!("Invalid JSON: {e}"))
            .with_detail("line", e.line())
            .with_detail("column", e.column())
    })
}

/// Read a schema file. Schemas must be JSON objects.
pub fn load_schema_file(path: &Path) -> Result<Value, FileValidationError> {
    let value = load_json_file(path)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(FileValidationError::new(
            FileErrorKind::InvalidJson,
            path.display().to_string(),
            "Schema must be a JSON object",
        ))
    }
}

/// Recursively find `.json` files under `dir`, skipping system files.
///
/// The extension match is case-insensitive. Results are sorted so batch
/// order is stable across platforms. Unreadable directories are logged
/// and skipped.
pub fn find_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    walk(dir, &mut results);
    results.sort();
    results
}

fn walk(dir: &Path, acc: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to read directory during file walk"
            );
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if is_system_file(&path) {
            tracing::debug!(path = %path.display(), "skipping system file");
            continue;
        }
        if path.is_dir() {
            walk(&path, acc);
        } else if has_json_extension(&path) {
            acc.push(path);
        }
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn loads_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "ok.json", br#"{"id": "1"}"#);
        let value = load_json_file(&path).unwrap();
        assert_eq!(value["id"], "1");
    }

    #[test]
    fn strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bom.json", b"\xEF\xBB\xBF{\"a\": 1}");
        assert_eq!(load_json_file(&path).unwrap()["a"], 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_json_file(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.error_type, FileErrorKind::FileNotFound);
    }

    #[test]
    fn whitespace_only_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "blank.json", b"  \n\t ");
        assert_eq!(load_json_file(&path).unwrap_err().error_type, FileErrorKind::FileEmpty);
    }

    #[test]
    fn invalid_utf8_is_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "latin1.json", b"{\"a\": \"\xff\"}");
        let err = load_json_file(&path).unwrap_err();
        assert_eq!(err.error_type, FileErrorKind::EncodingError);
        assert_eq!(err.details["position"], 7);
    }

    #[test]
    fn malformed_json_reports_line_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", b"{\n  \"a\": ,\n}");
        let err = load_json_file(&path).unwrap_err();
        assert_eq!(err.error_type, FileErrorKind::InvalidJson);
        assert_eq!(err.details["line"], 2);
    }

    #[test]
    fn truncated_json_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "cut.json", b"{\"a\": [1, 2");
        assert_eq!(load_json_file(&path).unwrap_err().error_type, FileErrorKind::InvalidJson);
    }

    #[test]
    fn directory_is_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("folder.json");
        std::fs::create_dir(&sub).unwrap();
        assert_eq!(load_json_file(&sub).unwrap_err().error_type, FileErrorKind::FileAccessError);
    }

    #[test]
    fn schema_must_be_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "arr.json", b"[1, 2]");
        let err = load_schema_file(&path).unwrap_err();
        assert_eq!(err.error_type, FileErrorKind::InvalidJson);
    }

    #[test]
    fn system_files_are_recognized() {
        assert!(is_system_file(Path::new("x/.DS_Store")));
        assert!(is_system_file(Path::new("x/__MACOSX")));
        assert!(is_system_file(Path::new("x/._organization.json")));
        assert!(is_system_file(Path::new("Thumbs.db")));
        assert!(!is_system_file(Path::new("x/organization.json")));
    }

    #[test]
    fn find_json_files_skips_system_entries_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("b");
        let mac = dir.path().join("__MACOSX");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(&mac).unwrap();
        write(dir.path(), "z.json", b"{}");
        write(&nested, "a.JSON", b"{}");
        write(&mac, "z.json", b"{}");
        write(dir.path(), "._z.json", b"{}");
        write(dir.path(), "notes.txt", b"hi");

        let files = find_json_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0] < files[1]);
        assert!(files.iter().all(|p| !p.to_string_lossy().contains("__MACOSX")));
    }

    #[test]
    fn find_json_files_on_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_json_files(&dir.path().join("missing")).is_empty());
    }
}
