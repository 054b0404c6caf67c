//! # Detect Subcommand
//!
//! Prints the identifier of the schema a family would be validated against.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use hsds_schema::{EngineConfig, ValidationEngine};

use crate::StrategyArg;

/// Arguments for the `hsds detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Schema file or directory of schema files. Repeatable.
    #[arg(short = 'j', long = "json-schema", alias = "json_schema", required = true, num_args = 1..)]
    pub json_schema: Vec<PathBuf>,

    /// How to choose the entry schema.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Filename or model name for the filename-token strategy.
    #[arg(long)]
    pub hint: Option<String>,
}

/// Execute the detect subcommand.
pub fn run_detect(args: &DetectArgs, config: EngineConfig) -> Result<u8> {
    let identifier = detect(args, config)?;
    println!("{identifier}");
    Ok(0)
}

fn detect(args: &DetectArgs, config: EngineConfig) -> Result<String> {
    let schemas = crate::load_schema_set(&args.json_schema)?;
    Ok(ValidationEngine::new(config).detect_main_schema(&schemas, args.hint.as_deref())?)
}
