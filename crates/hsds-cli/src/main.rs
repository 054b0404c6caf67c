//! # hsds CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hsds_cli::detect::{run_detect, DetectArgs};
use hsds_cli::resolve_config;
use hsds_cli::validate::{run_validate, ValidateArgs};

/// HSDS bulk validator
///
/// Validates directories of JSON documents against a family of interlinked
/// HSDS schemas.
#[derive(Parser, Debug)]
#[command(name = "hsds", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to an engine configuration file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a directory of documents against a schema family.
    Validate(ValidateArgs),

    /// Print the main schema of a schema family.
    Detect(DetectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "hsds CLI starting");

    let result = match &cli.command {
        Commands::Validate(args) => resolve_config(cli.config.as_deref(), args.strategy, args.jobs)
            .and_then(|config| run_validate(args, config)),
        Commands::Detect(args) => resolve_config(cli.config.as_deref(), args.strategy, None)
            .and_then(|config| run_detect(args, config)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
            ExitCode::from(2)
        }
    }
}
