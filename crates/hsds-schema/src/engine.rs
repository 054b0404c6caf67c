//! # Validation Engine
//!
//! The full pipeline for one batch:
//!
//! ```text
//! schema bodies ─► SchemaCatalog ─► MainSchemaSelector ─► ReferenceResolver
//!                                                              │
//!   BatchResult ◄─ BatchValidator ◄─ ValidatorCompiler ◄─ DialectNormalizer
//! ```
//!
//! Every stage before [`BatchValidator`] can fail with a [`SchemaError`],
//! and does so before any document is looked at. Document problems never
//! fail the batch. The engine keeps no state between batches.

use serde_json::Value;

use crate::batch::{BatchDocument, BatchValidator};
use crate::catalog::{SchemaCatalog, SchemaDocument};
use crate::compile::{CompiledValidator, ValidatorCompiler};
use crate::config::EngineConfig;
use crate::error::SchemaError;
use crate::normalize::DialectNormalizer;
use crate::report::BatchResult;
use crate::resolve::ReferenceResolver;
use crate::select::{MainSchemaSelector, SelectionStrategy, StrategyKind};

/// Validates document batches against schema families.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    config: EngineConfig,
    selector: MainSchemaSelector,
    normalizer: DialectNormalizer,
    compiler: ValidatorCompiler,
}

impl ValidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            selector: MainSchemaSelector::new(config.registry()),
            normalizer: config.normalizer(),
            compiler: ValidatorCompiler::new(config.compile_options()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A copy of this engine using a different selection strategy.
    pub fn with_strategy(&self, strategy: StrategyKind) -> Self {
        let mut engine = self.clone();
        engine.config.strategy = strategy;
        engine
    }

    /// Validate `documents` against the family in `schemas`.
    ///
    /// `hint` feeds the filename-token strategy; without one, the first
    /// document's filename is used. The reference-graph strategy ignores it.
    ///
    /// # Errors
    ///
    /// Any batch-level [`SchemaError`]: empty or malformed schema set,
    /// unresolvable reference, no unique main schema, or a schema that does
    /// not compile.
    pub fn validate(
        &self,
        schemas: &[Value],
        documents: &[BatchDocument],
        hint: Option<&str>,
    ) -> Result<BatchResult, SchemaError> {
        let hint = hint.or_else(|| documents.first().map(|d| d.filename.as_str()));
        let validator = self.prepare(schemas, hint)?;
        Ok(BatchValidator::new(&validator, self.config.concurrency).validate(documents))
    }

    /// Build the validator for a schema family without validating anything.
    pub fn prepare(
        &self,
        schemas: &[Value],
        hint: Option<&str>,
    ) -> Result<CompiledValidator, SchemaError> {
        let catalog = SchemaCatalog::from_bodies(schemas)?;
        let main = self.select(&catalog, hint)?;
        let resolved = ReferenceResolver::new(&catalog).resolve(main)?;
        let normalized = self.normalizer.normalize(&resolved);
        self.compiler.compile(main.identifier(), &normalized)
    }

    /// Identifier of the schema `validate` would use as the entry point.
    pub fn detect_main_schema(
        &self,
        schemas: &[Value],
        hint: Option<&str>,
    ) -> Result<String, SchemaError> {
        let catalog = SchemaCatalog::from_bodies(schemas)?;
        Ok(self.select(&catalog, hint)?.identifier().to_string())
    }

    fn select<'c>(
        &self,
        catalog: &'c SchemaCatalog,
        hint: Option<&str>,
    ) -> Result<&'c SchemaDocument, SchemaError> {
        let strategy = match self.config.strategy {
            StrategyKind::ReferenceGraph => SelectionStrategy::ReferenceGraph,
            StrategyKind::FilenameToken => {
                SelectionStrategy::FilenameToken(hint.unwrap_or_default().to_string())
            }
        };
        self.selector.select(catalog, &strategy)
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
