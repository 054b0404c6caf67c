//! # hsds-schema — Schema Graph Resolution & Bulk Validation
//!
//! Validates batches of JSON documents against a family of interlinked
//! HSDS schemas that reference each other by filename.
//!
//! ## Responsibilities
//!
//! - **Catalog:** index schema bodies by their declared `name` and resolve
//!   `$ref` targets by identifier, basename, or stem ([`catalog`]).
//! - **Resolution:** inline every external `$ref` into one self-contained
//!   tree, substituting a permissive placeholder where a cycle closes
//!   ([`resolve`]).
//! - **Normalization:** strip HSDS dialect keys from schema positions
//!   ([`normalize`]).
//! - **Selection:** pick the entry schema from the reference graph or from a
//!   filename hint ([`select`]).
//! - **Compilation & validation:** build one validator per batch and apply it
//!   to every document, in parallel, reporting violations with dot-joined
//!   paths ([`compile`], [`batch`], [`report`]).
//!
//! ## Design
//!
//! [`ValidationEngine`] ties the stages together. Batch-level failures are
//! [`SchemaError`] values returned before any document is validated; problems
//! with individual documents are carried inside the [`BatchResult`] and never
//! abort the batch. Nothing here performs network I/O.

pub mod batch;
pub mod catalog;
pub mod compile;
pub mod config;
pub mod engine;
pub mod error;
pub mod node;
pub mod normalize;
pub mod report;
pub mod resolve;
pub mod select;

// Re-export primary types.
pub use batch::{BatchDocument, BatchValidator};
pub use catalog::{SchemaCatalog, SchemaDocument};
pub use compile::{CompileOptions, CompiledValidator, ValidatorCompiler};
pub use config::{ConfigError, EngineConfig};
pub use engine::ValidationEngine;
pub use error::SchemaError;
pub use node::SchemaNode;
pub use normalize::DialectNormalizer;
pub use report::{BatchReport, BatchResult, PathSegment, ValidationOutcome, ValidationViolation};
pub use resolve::ReferenceResolver;
pub use select::{MainSchemaSelector, SelectionStrategy, StrategyKind};
