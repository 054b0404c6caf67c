//! # hsds-core — Foundational Types for the HSDS Validator
//!
//! Leaf crate of the workspace. Defines the pieces every front end shares
//! regardless of how documents reach the validation engine.
//!
//! ## Contents
//!
//! - [`error`] — the stable file-error taxonomy ([`FileErrorKind`]) and the
//!   structured [`FileValidationError`] produced when a file cannot be turned
//!   into a JSON value.
//! - [`registry`] — [`ModelRegistry`], an explicit list of known data model
//!   names used by filename-token schema selection. The HSDS 3.1 model list
//!   is available as [`ModelRegistry::hsds`].
//! - [`load`] — reading JSON files with error classification, and discovery
//!   of `.json` files under a directory while skipping system files.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hsds-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod load;
pub mod registry;

pub use error::{FileErrorKind, FileValidationError};
pub use load::{find_json_files, is_system_file, load_json_file, load_schema_file};
pub use registry::{normalize_model_token, ModelRegistry, HSDS_MODEL_NAMES};
