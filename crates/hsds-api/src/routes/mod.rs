//! # Route Handlers
//!
//! - [`health`] — liveness probe at `/health`.
//! - [`validate`] — batch validation at `/validate`.

pub mod health;
pub mod validate;
