//! # Batch Validation
//!
//! Validates a list of documents against one compiled validator and returns
//! one [`ValidationOutcome`] per input, in input order.
//!
//! Documents are independent. With a concurrency limit above one they are
//! spread over a dedicated `rayon` pool; the indexed parallel iterator
//! collects by position, so order never depends on scheduling. A panic
//! raised while validating one document is contained and reported as a
//! violation of that document alone.

use std::panic::{catch_unwind, AssertUnwindSafe};

use hsds_core::FileValidationError;
use rayon::prelude::*;
use serde_json::Value;

use crate::compile::CompiledValidator;
use crate::report::{BatchResult, ValidationOutcome, ValidationViolation};

/// One document of a batch.
///
/// A document that could not be loaded still takes part in the batch,
/// carrying its file error instead of a body.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchDocument {
    pub filename: String,
    pub body: Result<Value, FileValidationError>,
}

impl BatchDocument {
    pub fn new(filename: impl Into<String>, body: Value) -> Self {
        Self {
            filename: filename.into(),
            body: Ok(body),
        }
    }

    pub fn failed(filename: impl Into<String>, error: FileValidationError) -> Self {
        Self {
            filename: filename.into(),
            body: Err(error),
        }
    }
}

/// Validates documents against a compiled validator.
#[derive(Debug)]
pub struct BatchValidator<'v> {
    validator: &'v CompiledValidator,
    concurrency: usize,
}

impl<'v> BatchValidator<'v> {
    /// A batch validator running at most `concurrency` documents at once.
    /// Zero is treated as one.
    pub fn new(validator: &'v CompiledValidator, concurrency: usize) -> Self {
        Self {
            validator,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Validate every document.
    pub fn validate(&self, documents: &[BatchDocument]) -> BatchResult {
        let outcomes = if self.concurrency == 1 || documents.len() < 2 {
            self.sequential(documents)
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.concurrency)
                .build()
            {
                Ok(pool) => pool.install(|| {
                    documents
                        .par_iter()
                        .map(|doc| self.validate_one(doc))
                        .collect::<Vec<_>>()
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "thread pool unavailable; validating sequentially");
                    self.sequential(documents)
                }
            }
        };

        let result = BatchResult::new(outcomes);
        tracing::info!(
            schema = self.validator.schema_name(),
            total = result.total(),
            successful = result.successful(),
            failed = result.failed(),
            "batch validated"
        );
        result
    }

    fn sequential(&self, documents: &[BatchDocument]) -> Vec<ValidationOutcome> {
        documents.iter().map(|doc| self.validate_one(doc)).collect()
    }

    /// Validate a single document.
    pub fn validate_one(&self, document: &BatchDocument) -> ValidationOutcome {
        let violations = match &document.body {
            Err(file_error) => vec![ValidationViolation::from_file_error(file_error)],
            Ok(body) => catch_unwind(AssertUnwindSafe(|| self.validator.check(body)))
                .unwrap_or_else(|panic| vec![ValidationViolation::unexpected(&panic_message(&*panic))]),
        };
        tracing::debug!(
            filename = %document.filename,
            violations = violations.len(),
            "document validated"
        );
        ValidationOutcome::new(document.filename.clone(), violations)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "validator panicked".to_string()
    }
}
