//! # Batch-Level Errors
//!
//! Failures that abort a whole batch before any document is validated:
//! catalog construction, reference resolution, main-schema selection, and
//! validator compilation. Per-document problems are never represented here;
//! they travel as violations inside the batch report.
//!
//! Every variant has a stable machine-readable [`SchemaError::code`] so front
//! ends can map it into their own envelopes.

use serde_json::{json, Value};
use thiserror::Error;

/// An error that prevents a batch from being validated at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No schemas were supplied.
    #[error("no schemas provided")]
    EmptySchemaSet,

    /// A schema body has no string `name` to identify it.
    #[error("schema at position {index} has no string \"name\" field to identify it")]
    MissingSchemaIdentifier {
        /// Position of the schema in the input.
        index: usize,
    },

    /// Two schemas declare the same identifier.
    #[error("duplicate schema identifier '{0}'")]
    DuplicateSchemaIdentifier(String),

    /// A `$ref` names no schema in the catalog.
    #[error("could not resolve reference '{reference}'. Available schemas: {available:?}")]
    UnresolvedReference {
        /// The `$ref` value as written.
        reference: String,
        /// Every filename the catalog can resolve.
        available: Vec<String>,
    },

    /// Every schema is referenced by another one.
    #[error(
        "no main schema found: all schemas are referenced by others. \
         This suggests a circular reference or missing main schema"
    )]
    NoMainSchema,

    /// More than one schema is unreferenced.
    #[error(
        "multiple potential main schemas found: {candidates:?}. \
         Please ensure only one schema is not referenced by others"
    )]
    AmbiguousMainSchema {
        /// Identifiers of all unreferenced schemas, sorted.
        candidates: Vec<String>,
    },

    /// The selection hint matches no registered model name.
    #[error("no model matches '{hint}' (normalized token '{token}')")]
    NoModelMatch {
        /// The hint as supplied.
        hint: String,
        /// The hint after normalization.
        token: String,
    },

    /// The selection hint matches several registered model names.
    #[error("multiple models match '{hint}': {matches:?}")]
    AmbiguousModelMatch {
        /// The hint as supplied.
        hint: String,
        /// Every matching model name.
        matches: Vec<String>,
    },

    /// The model chosen by filename has no schema in the catalog.
    #[error("model '{model}' has no schema in this batch. Available schemas: {available:?}")]
    ModelSchemaMissing {
        /// The matched model name.
        model: String,
        /// Catalog identifiers.
        available: Vec<String>,
    },

    /// The normalized schema could not be compiled into a validator.
    #[error("schema compilation failed at '{path}': {reason}")]
    SchemaCompilation {
        /// Dot-joined location of the offending construct inside the schema.
        path: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl SchemaError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptySchemaSet => "EMPTY_SCHEMA_SET",
            Self::MissingSchemaIdentifier { .. } => "MISSING_SCHEMA_IDENTIFIER",
            Self::DuplicateSchemaIdentifier(_) => "DUPLICATE_SCHEMA_IDENTIFIER",
            Self::UnresolvedReference { .. } => "UNRESOLVED_REFERENCE",
            Self::NoMainSchema => "NO_MAIN_SCHEMA",
            Self::AmbiguousMainSchema { .. } => "AMBIGUOUS_MAIN_SCHEMA",
            Self::NoModelMatch { .. } => "NO_MODEL_MATCH",
            Self::AmbiguousModelMatch { .. } => "AMBIGUOUS_MODEL_MATCH",
            Self::ModelSchemaMissing { .. } => "MODEL_SCHEMA_MISSING",
            Self::SchemaCompilation { .. } => "SCHEMA_COMPILATION_ERROR",
        }
    }

    /// The `{"error": message}` envelope used for top-level failures.
    pub fn envelope(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}
