//! # Error Types — File Error Taxonomy
//!
//! Structured errors for files that could not be turned into JSON values.
//! Front ends (CLI, API) produce these while loading input; the validation
//! engine carries them into the per-document report so a single unreadable
//! file never aborts a batch.
//!
//! ## Design
//!
//! - [`FileErrorKind`] is a closed, stable enum. Its serialized form
//!   (`FILE_NOT_FOUND`, `INVALID_JSON`, ...) is part of the public report
//!   contract and must not change.
//! - [`FileValidationError`] carries the kind, the offending path, a
//!   human-readable message, and free-form details (line numbers, offsets).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a file-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileErrorKind {
    /// The file does not exist.
    FileNotFound,
    /// The file exists but has no content.
    FileEmpty,
    /// The file content is not well-formed JSON.
    InvalidJson,
    /// The JSON parser failed for a reason other than malformed text.
    JsonParseError,
    /// The file could not be read (permissions, I/O failure).
    FileAccessError,
    /// The file content is not valid UTF-8.
    EncodingError,
    /// Anything else.
    UnknownError,
}

impl FileErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [FileErrorKind; 7] = [
        Self::FileNotFound,
        Self::FileEmpty,
        Self::InvalidJson,
        Self::JsonParseError,
        Self::FileAccessError,
        Self::EncodingError,
        Self::UnknownError,
    ];

    /// Stable wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::FileEmpty => "FILE_EMPTY",
            Self::InvalidJson => "INVALID_JSON",
            Self::JsonParseError => "JSON_PARSE_ERROR",
            Self::FileAccessError => "FILE_ACCESS_ERROR",
            Self::EncodingError => "ENCODING_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file could not be loaded as JSON.
///
/// Renders as `[KIND] message (File: path)`, followed by
/// ` - Details: k: v, ...` when details are present.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{}", render(.error_type, .filepath, .message, .details))]
pub struct FileValidationError {
    /// What went wrong.
    pub error_type: FileErrorKind,
    /// Path of the file, as given by the caller.
    pub filepath: String,
    /// Human-readable message.
    pub message: String,
    /// Additional context such as line and column.
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl FileValidationError {
    /// Create an error without details.
    pub fn new(
        error_type: FileErrorKind,
        filepath: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error_type,
            filepath: filepath.into(),
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Attach a detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

fn render(
    kind: &FileErrorKind,
    filepath: &str,
    message: &str,
    details: &BTreeMap<String, serde_json::Value>,
) -> String {
    let mut out = format!("[{kind}] {message} (File: {filepath})");
    if !details.is_empty() {
        let joined: Vec<String> = details
            .iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => format!("{k}: {s}"),
                other => format!("{k}: {other}"),
            })
            .collect();
        out.push_str(" - Details: ");
        out.push_str(&joined.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_serializes_screaming_snake_case() {
        for kind in FileErrorKind::ALL {
            let encoded = serde_json::to_value(kind).unwrap();
            assert_eq!(encoded, json!(kind.as_str()));
        }
    }

    #[test]
    fn kind_round_trips_from_wire_name() {
        let kind: FileErrorKind = serde_json::from_value(json!("ENCODING_ERROR")).unwrap();
        assert_eq!(kind, FileErrorKind::EncodingError);
    }

    #[test]
    fn display_without_details() {
        let err = FileValidationError::new(FileErrorKind::FileEmpty, "a.json", "File is empty");
        assert_eq!(err.to_string(), "[FILE_EMPTY] File is empty (File: a.json)");
    }

    #[test]
    fn display_with_details() {
        let err = FileValidationError::new(FileErrorKind::InvalidJson, "b.json", "Malformed JSON")
            .with_detail("line", 3)
            .with_detail("column", 7);
        assert_eq!(
            err.to_string(),
            "[INVALID_JSON] Malformed JSON (File: b.json) - Details: column: 7, line: 3"
        );
    }

    #[test]
    fn serializes_with_error_type_field() {
        let err = FileValidationError::new(FileErrorKind::FileNotFound, "c.json", "missing");
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v["error_type"], "FILE_NOT_FOUND");
        assert_eq!(v["filepath"], "c.json");
        assert_eq!(v["message"], "missing");
        assert_eq!(v["details"], json!({}));
    }
}
