//! # Validation Reports
//!
//! Per-document violations, per-document outcomes, and the batch result with
//! its JSON report shape:
//!
//! ```json
//! {
//!   "success": false,
//!   "summary": {"total_files": 2, "successful": 1, "failed": 1},
//!   "successful_files": ["a.json"],
//!   "failed_files": ["b.json"],
//!   "errors": [
//!     {"filename": "b.json", "errors": [{"column": "id", "input": 5, "error": "5 is not of type \"string\""}]}
//!   ]
//! }
//! ```
//!
//! Paths are reconstructed from the library's JSON pointer by walking the
//! instance, so an object key that happens to look like a number stays a
//! key and only genuine array positions become indices.

use std::fmt;

use hsds_core::FileValidationError;
use jsonschema::error::ValidationErrorKind;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One step into a JSON instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Render a path as the dot-joined `column` string. The root is `""`.
pub fn render_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a JSON pointer into segments, using `instance` to tell array
/// indices from object keys.
pub fn pointer_segments(instance: &Value, pointer: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut current = Some(instance);
    for raw in pointer.split('/').skip(1) {
        let token = raw.replace("~1", "/").replace("~0", "~");
        let segment = match (current, token.parse::<usize>()) {
            (Some(Value::Array(_)), Ok(index)) => PathSegment::Index(index),
            _ => PathSegment::Key(token),
        };
        current = current.and_then(|value| match (&segment, value) {
            (PathSegment::Index(i), Value::Array(items)) => items.get(*i),
            (PathSegment::Key(k), Value::Object(map)) => map.get(k),
            _ => None,
        });
        segments.push(segment);
    }
    segments
}

/// A single way in which a document fails its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationViolation {
    pub path: Vec<PathSegment>,
    pub message: String,
    pub input: Option<Value>,
}

impl ValidationViolation {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            input: None,
        }
    }

    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Convert a library error raised while validating `instance`.
    ///
    /// `required` violations point at the missing property and carry no
    /// input; `additionalProperties` violations carry no input either.
    pub fn from_error(instance: &Value, error: &jsonschema::ValidationError<'_>) -> Self {
        let mut path = pointer_segments(instance, &error.instance_path.to_string());
        let message = error.to_string();
        match &error.kind {
            ValidationErrorKind::Required { property } => {
                if let Some(name) = property.as_str() {
                    path.push(PathSegment::Key(name.to_string()));
                }
                Self::new(path, message)
            }
            ValidationErrorKind::AdditionalProperties { .. } => Self::new(path, message),
            _ => Self::new(path, message).with_input(error.instance.clone().into_owned()),
        }
    }

    /// The violation recorded for a document that could not be loaded.
    pub fn from_file_error(error: &FileValidationError) -> Self {
        Self::new(Vec::new(), error.to_string())
    }

    /// The violation recorded when validation itself blew up.
    pub fn unexpected(detail: &str) -> Self {
        Self::new(Vec::new(), format!("Unexpected validation error: {detail}"))
    }

    /// Dot-joined path, e.g. `addresses.0.postal_code`.
    pub fn column(&self) -> String {
        render_path(&self.path)
    }

    fn entry(&self) -> ErrorEntry {
        ErrorEntry {
            column: self.column(),
            input: self.input.clone(),
            error: self.message.clone(),
        }
    }
}

/// The result of validating one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub filename: String,
    pub success: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationOutcome {
    /// An outcome whose success is derived from the violation list.
    pub fn new(filename: impl Into<String>, violations: Vec<ValidationViolation>) -> Self {
        Self {
            filename: filename.into(),
            success: violations.is_empty(),
            violations,
        }
    }

    pub fn passed(filename: impl Into<String>) -> Self {
        Self::new(filename, Vec::new())
    }

    fn entries(&self) -> Vec<ErrorEntry> {
        self.violations.iter().map(ValidationViolation::entry).collect()
    }
}

#[derive(Serialize)]
struct OutcomeRepr<'a> {
    filename: &'a str,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ErrorEntry>>,
}

impl Serialize for ValidationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeRepr {
            filename: &self.filename,
            success: self.success,
            errors: (!self.success).then(|| self.entries()),
        }
        .serialize(serializer)
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    outcomes: Vec<ValidationOutcome>,
}

impl BatchResult {
    pub fn new(outcomes: Vec<ValidationOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ValidationOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<ValidationOutcome> {
        self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.successful()
    }

    /// True when every document passed. An empty batch is a success.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    pub fn successful_files(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.success)
            .map(|o| o.filename.as_str())
            .collect()
    }

    pub fn failed_files(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.filename.as_str())
            .collect()
    }

    /// Build the serializable report.
    pub fn report(&self) -> BatchReport {
        BatchReport {
            success: self.is_success(),
            summary: Summary {
                total_files: self.total(),
                successful: self.successful(),
                failed: self.failed(),
            },
            successful_files: self.successful_files().into_iter().map(String::from).collect(),
            failed_files: self.failed_files().into_iter().map(String::from).collect(),
            errors: self
                .outcomes
                .iter()
                .filter(|o| !o.success)
                .map(|o| FileErrors {
                    filename: o.filename.clone(),
                    errors: o.entries(),
                })
                .collect(),
        }
    }
}

impl Serialize for BatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.report().serialize(serializer)
    }
}

/// The JSON report for a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub success: bool,
    pub summary: Summary,
    pub successful_files: Vec<String>,
    pub failed_files: Vec<String>,
    pub errors: Vec<FileErrors>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
}

/// All violations of one failed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileErrors {
    pub filename: String,
    pub errors: Vec<ErrorEntry>,
}

/// One rendered violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsds_core::FileErrorKind;
    use serde_json::json;

    fn violations(schema: Value, instance: &Value) -> Vec<ValidationViolation> {
        let validator = jsonschema::validator_for(&schema).unwrap();
        validator
            .iter_errors(instance)
            .map(|e| ValidationViolation::from_error(instance, &e))
            .collect()
    }

    #[test]
    fn pointer_walk_distinguishes_indices_from_numeric_keys() {
        let instance = json!({"addresses": [{"postal_code": 1}], "map": {"0": {"x": 1}}});
        assert_eq!(
            render_path(&pointer_segments(&instance, "/addresses/0/postal_code")),
            "addresses.0.postal_code"
        );
        assert_eq!(
            pointer_segments(&instance, "/addresses/0"),
            vec![PathSegment::Key("addresses".into()), PathSegment::Index(0)]
        );
        assert_eq!(
            pointer_segments(&instance, "/map/0"),
            vec![PathSegment::Key("map".into()), PathSegment::Key("0".into())]
        );
    }

    #[test]
    fn pointer_unescapes_tokens() {
        let instance = json!({"a/b": {"c~d": 1}});
        assert_eq!(
            pointer_segments(&instance, "/a~1b/c~0d"),
            vec![PathSegment::Key("a/b".into()), PathSegment::Key("c~d".into())]
        );
    }

    #[test]
    fn root_renders_empty() {
        assert_eq!(pointer_segments(&json!({}), ""), Vec::new());
        assert_eq!(render_path(&[]), "");
    }

    #[test]
    fn type_violation_carries_input() {
        let instance = json!({"id": 5});
        let found = violations(
            json!({"type": "object", "properties": {"id": {"type": "string"}}}),
            &instance,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].column(), "id");
        assert_eq!(found[0].input, Some(json!(5)));
        assert!(found[0].message.contains("string"));
    }

    #[test]
    fn required_violation_points_at_missing_property() {
        let instance = json!({"child": {}});
        let found = violations(
            json!({"properties": {"child": {"type": "object", "required": ["name"]}}}),
            &instance,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].column(), "child.name");
        assert_eq!(found[0].input, None);
    }

    #[test]
    fn additional_properties_violation_has_no_input() {
        let instance = json!({"extra": 1});
        let found = violations(json!({"additionalProperties": false}), &instance);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].column(), "");
        assert_eq!(found[0].input, None);
    }

    #[test]
    fn file_error_violation_renders_file_error() {
        let err = FileValidationError::new(FileErrorKind::InvalidJson, "bad.json", "Invalid JSON");
        let v = ValidationViolation::from_file_error(&err);
        assert_eq!(v.column(), "");
        assert!(v.message.starts_with("[INVALID_JSON] Invalid JSON (File: bad.json)"));
        assert_eq!(v.input, None);
    }

    #[test]
    fn outcome_serializes_errors_only_on_failure() {
        let ok = serde_json::to_value(ValidationOutcome::passed("a.json")).unwrap();
        assert_eq!(ok, json!({"filename": "a.json", "success": true}));

        let failed = ValidationOutcome::new(
            "b.json",
            vec![ValidationViolation::new(vec![PathSegment::Key("id".into())], "bad").with_input(json!(5))],
        );
        assert_eq!(
            serde_json::to_value(failed).unwrap(),
            json!({
                "filename": "b.json",
                "success": false,
                "errors": [{"column": "id", "input": 5, "error": "bad"}]
            })
        );
    }

    #[test]
    fn batch_report_shape() {
        let result = BatchResult::new(vec![
            ValidationOutcome::passed("a.json"),
            ValidationOutcome::new("b.json", vec![ValidationViolation::unexpected("boom")]),
        ]);
        assert_eq!(result.total(), 2);
        assert_eq!(result.successful(), 1);
        assert_eq!(result.failed(), 1);
        assert!(!result.is_success());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": false,
                "summary": {"total_files": 2, "successful": 1, "failed": 1},
                "successful_files": ["a.json"],
                "failed_files": ["b.json"],
                "errors": [{
                    "filename": "b.json",
                    "errors": [{"column": "", "error": "Unexpected validation error: boom"}]
                }]
            })
        );
    }

    #[test]
    fn empty_batch_is_successful() {
        let report = BatchResult::default().report();
        assert!(report.success);
        assert_eq!(report.summary.total_files, 0);
    }
}
