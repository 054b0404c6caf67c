//! # Engine Configuration
//!
//! [`EngineConfig`] gathers everything that changes how a batch is validated.
//! It deserializes from YAML or JSON (YAML being a superset, both go through
//! `serde_yaml`); every field is optional and falls back to its default.
//!
//! ```yaml
//! strategy: filename_token
//! concurrency: 4
//! forbid_additional_properties: false
//! models: [Organization, Service, Location]
//! ```

use std::path::{Path, PathBuf};

use hsds_core::registry::{ModelRegistry, HSDS_MODEL_NAMES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compile::CompileOptions;
use crate::normalize::{DialectNormalizer, HSDS_EXTENSION_KEYS};
use crate::select::StrategyKind;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseStr(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration of a [`ValidationEngine`](crate::engine::ValidationEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// How the entry schema is chosen.
    pub strategy: StrategyKind,
    /// Maximum number of documents validated at once.
    pub concurrency: usize,
    /// Reject properties a schema does not declare. On by default; a schema
    /// that sets `additionalProperties` itself is left alone.
    pub forbid_additional_properties: bool,
    /// Assert `format` keywords.
    pub validate_formats: bool,
    /// Keys stripped from schemas before compilation.
    pub extension_keys: Vec<String>,
    /// Model names known to the filename-token strategy.
    pub models: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            concurrency: default_concurrency(),
            forbid_additional_properties: true,
            validate_formats: false,
            extension_keys: HSDS_EXTENSION_KEYS.iter().map(|k| k.to_string()).collect(),
            models: HSDS_MODEL_NAMES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

impl EngineConfig {
    /// Parse a YAML or JSON document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.strategy == StrategyKind::FilenameToken && self.models.is_empty() {
            return Err(ConfigError::Invalid(
                "filename_token strategy needs at least one model name".into(),
            ));
        }
        Ok(())
    }

    pub fn registry(&self) -> ModelRegistry {
        ModelRegistry::new(self.models.iter().cloned())
    }

    pub fn normalizer(&self) -> DialectNormalizer {
        DialectNormalizer::new(self.extension_keys.iter().cloned())
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            forbid_additional_properties: self.forbid_additional_properties,
            validate_formats: self.validate_formats,
        }
    }
}
