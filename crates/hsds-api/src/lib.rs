//! # hsds-api — HTTP Front End for the HSDS Validator
//!
//! An Axum service around [`hsds_schema::ValidationEngine`]. Clients post a
//! schema family and a batch of documents; the service answers with the
//! batch report.
//!
//! ## API Surface
//!
//! | Route               | Module                  | Purpose                 |
//! |---------------------|-------------------------|-------------------------|
//! | `GET /health`       | [`routes::health`]      | Liveness probe          |
//! | `POST /validate`    | [`routes::validate`]    | Batch validation        |
//! | `GET /openapi.json` | [`openapi`]             | Generated OpenAPI spec  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → DefaultBodyLimit → Handler
//! ```

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .merge(routes::health::router())
        .merge(routes::validate::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
