//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented routes into one OpenAPI spec served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI spec for the whole API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HSDS Validator API",
        description = "Validates batches of JSON documents against a family of interlinked HSDS schemas.\n\nSchemas reference each other by filename through `$ref`; the service inlines them, picks the entry schema, and reports every violation per document."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::health::health,
        crate::routes::validate::validate,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::health::HealthResponse,
        crate::routes::validate::DocumentInput,
        crate::routes::validate::ValidateRequest,
        crate::routes::validate::ValidationReport,
        crate::routes::validate::ReportSummary,
        crate::routes::validate::FileReport,
        crate::routes::validate::ViolationEntry,
    )),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "validation", description = "Batch validation"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
