//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. The service keeps nothing between requests
//! apart from its configuration and the engine built from it.

use std::path::PathBuf;
use std::sync::Arc;

use hsds_schema::{ConfigError, EngineConfig, ValidationEngine};

/// Default request body limit: 16 MiB.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub body_limit_bytes: usize,
    /// Engine settings applied to every request.
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build configuration from `PORT`, `HSDS_BODY_LIMIT_BYTES` and
    /// `HSDS_CONFIG`. Unset or unparseable numbers fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let body_limit_bytes = lookup("HSDS_BODY_LIMIT_BYTES")
            .and_then(|b| b.parse().ok())
            .unwrap_or(defaults.body_limit_bytes);
        let engine = match lookup("HSDS_CONFIG") {
            Some(path) => EngineConfig::load(&PathBuf::from(path))?,
            None => defaults.engine,
        };
        Ok(Self {
            port,
            body_limit_bytes,
            engine,
        })
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<ValidationEngine>,
}

impl AppState {
    /// State with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let engine = ValidationEngine::new(config.engine.clone());
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
