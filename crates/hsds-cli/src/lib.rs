//! # hsds-cli — Command-Line Front End for the HSDS Validator
//!
//! Provides the `hsds` binary.
//!
//! ## Subcommands
//!
//! - `hsds validate` — validate every `.json` file under a directory against
//!   a schema family and print the batch report.
//! - `hsds detect` — print which schema of a family is the entry point.
//!
//! ```bash
//! hsds validate -i data/ -j schema/ --save
//! hsds validate -i data/ -j organization.json -j phone.json --strategy filename-token
//! hsds detect -j schema/
//! ```
//!
//! ## Exit Codes
//!
//! `0` every document is valid, `1` some documents failed, `2` the batch
//! could not be validated at all (the error is printed as `{"error": ...}`).

pub mod detect;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde_json::Value;

use hsds_core::{find_json_files, load_schema_file};
use hsds_schema::{EngineConfig, StrategyKind};

/// Command-line spelling of the selection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// The single schema no other schema references.
    ReferenceGraph,
    /// The schema whose model name matches the hint or first filename.
    FilenameToken,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ReferenceGraph => StrategyKind::ReferenceGraph,
            StrategyArg::FilenameToken => StrategyKind::FilenameToken,
        }
    }
}

/// Load the config file if one is given, apply flag overrides, and check
/// the result.
pub fn resolve_config(
    path: Option<&Path>,
    strategy: Option<StrategyArg>,
    jobs: Option<usize>,
) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(strategy) = strategy {
        config.strategy = strategy.into();
    }
    if let Some(jobs) = jobs {
        config.concurrency = jobs;
    }
    config.validate()?;
    Ok(config)
}

/// Load schema bodies from files and directories, in argument order.
///
/// Directories contribute every `.json` file beneath them. Any schema that
/// cannot be loaded fails the whole set.
pub fn load_schema_set(paths: &[PathBuf]) -> Result<Vec<Value>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = find_json_files(path);
            if found.is_empty() {
                bail!("no .json schema files found in {}", path.display());
            }
            files.extend(found);
        } else if has_json_extension(path) {
            files.push(path.clone());
        } else {
            bail!("schema file must have a .json extension: {}", path.display());
        }
    }

    let schemas = files
        .iter()
        .map(|file| {
            load_schema_file(file).with_context(|| format!("failed to load schema {}", file.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(count = schemas.len(), "loaded schema set");
    Ok(schemas)
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
