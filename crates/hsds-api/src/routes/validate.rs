//! # Batch Validation Endpoint
//!
//! `POST /validate` takes a schema family and a batch of documents in one
//! JSON body and answers with the batch report. Batch-level failures (no
//! main schema, unresolved reference, ...) are 422 responses carrying the
//! engine's error code; document failures are part of a 200 report.
//!
//! Validation is CPU-bound, so each batch runs on the blocking pool.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use hsds_schema::report::{BatchReport, ErrorEntry, FileErrors, Summary};
use hsds_schema::{BatchDocument, StrategyKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// One document of the batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentInput {
    /// Name reported for this document; also the default filename hint.
    pub filename: String,
    /// The document itself.
    #[schema(value_type = Object)]
    pub content: Value,
}

/// Request body for `POST /validate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateRequest {
    /// Schema bodies; each must carry a string `name`.
    #[schema(value_type = Vec<Object>)]
    pub schemas: Vec<Value>,
    pub documents: Vec<DocumentInput>,
    /// `reference_graph` or `filename_token`. Defaults to the server setting.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "reference_graph")]
    pub strategy: Option<StrategyKind>,
    /// Filename hint for the `filename_token` strategy.
    #[serde(default)]
    pub hint: Option<String>,
}

impl ValidateRequest {
    fn check(&self) -> Result<(), AppError> {
        if self.schemas.is_empty() {
            return Err(AppError::Validation("at least one schema is required".into()));
        }
        if self.documents.is_empty() {
            return Err(AppError::Validation("at least one document is required".into()));
        }
        Ok(())
    }
}

/// Batch report returned by `POST /validate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationReport {
    pub success: bool,
    pub summary: ReportSummary,
    pub successful_files: Vec<String>,
    pub failed_files: Vec<String>,
    pub errors: Vec<FileReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportSummary {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Violations of one failed document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileReport {
    pub filename: String,
    pub errors: Vec<ViolationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViolationEntry {
    /// Dot-joined path to the offending value; empty for the document root.
    pub column: String,
    /// The offending value, when it adds information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub input: Option<Value>,
    pub error: String,
}

impl From<BatchReport> for ValidationReport {
    fn from(report: BatchReport) -> Self {
        let Summary {
            total_files,
            successful,
            failed,
        } = report.summary;
        Self {
            success: report.success,
            summary: ReportSummary {
                total_files,
                successful,
                failed,
            },
            successful_files: report.successful_files,
            failed_files: report.failed_files,
            errors: report.errors.into_iter().map(FileReport::from).collect(),
        }
    }
}

impl From<FileErrors> for FileReport {
    fn from(file: FileErrors) -> Self {
        Self {
            filename: file.filename,
            errors: file
                .errors
                .into_iter()
                .map(|ErrorEntry { column, input, error }| ViolationEntry {
                    column,
                    input,
                    error,
                })
                .collect(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/validate", post(validate))
}

/// POST /validate — Validate a document batch against a schema family.
#[utoipa::path(
    post,
    path = "/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Batch validated; see `success` for the outcome", body = ValidationReport),
        (status = 422, description = "Malformed request or unusable schema family", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub async fn validate(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidationReport>, AppError> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request.check()?;

    let ValidateRequest {
        schemas,
        documents,
        strategy,
        hint,
    } = request;
    let engine = match strategy {
        Some(kind) => state.engine.with_strategy(kind),
        None => state.engine.as_ref().clone(),
    };
    let documents: Vec<BatchDocument> = documents
        .into_iter()
        .map(|d| BatchDocument::new(d.filename, d.content))
        .collect();

    tracing::info!(
        schemas = schemas.len(),
        documents = documents.len(),
        "validation request received"
    );

    let result = tokio::task::spawn_blocking(move || {
        engine.validate(&schemas, &documents, hint.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(format!("validation task failed: {e}")))??;

    Ok(Json(ValidationReport::from(result.report())))
}
