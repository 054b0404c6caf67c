//! # Validate Subcommand
//!
//! Validates every `.json` document under an input directory against a
//! schema family and prints the batch report as JSON.
//!
//! Documents that cannot be read or parsed do not stop the run; they show up
//! in the report as failed files carrying their file error. Schemas that
//! cannot be loaded do stop it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use hsds_core::{find_json_files, load_json_file};
use hsds_schema::{BatchDocument, EngineConfig, ValidationEngine};

use crate::StrategyArg;

/// Arguments for the `hsds validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory of JSON documents to validate. Must exist and not be empty.
    #[arg(short = 'i', long = "input-dir", alias = "input_dir")]
    pub input_dir: PathBuf,

    /// Schema file or directory of schema files. Repeatable.
    #[arg(short = 'j', long = "json-schema", alias = "json_schema", required = true, num_args = 1..)]
    pub json_schema: Vec<PathBuf>,

    /// Save the report as `validation_results_<timestamp>.json`.
    #[arg(short, long)]
    pub save: bool,

    /// Where to save the report. Defaults to the current directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// How to choose the entry schema.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Filename or model name for the filename-token strategy.
    #[arg(long)]
    pub hint: Option<String>,

    /// Maximum number of documents validated at once.
    #[arg(long)]
    pub jobs: Option<usize>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 if every document is valid, 1 if any failed.
/// Batch-level problems are returned as errors.
pub fn run_validate(args: &ValidateArgs, config: EngineConfig) -> Result<u8> {
    check_input_dir(&args.input_dir)?;
    let schemas = crate::load_schema_set(&args.json_schema)?;
    let documents = collect_documents(&args.input_dir);
    tracing::info!(
        input_dir = %args.input_dir.display(),
        documents = documents.len(),
        "collected documents"
    );

    let engine = ValidationEngine::new(config);
    let result = engine.validate(&schemas, &documents, args.hint.as_deref())?;
    let report = serde_json::to_string_pretty(&result).context("failed to serialize report")?;
    println!("{report}");

    if args.save {
        let dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let path = save_report(&report, &dir)?;
        tracing::info!(path = %path.display(), "report saved");
    }

    Ok(if result.is_success() { 0 } else { 1 })
}

fn check_input_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("input directory does not exist: {}", dir.display());
    }
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read input directory {}", dir.display()))?;
    if entries.next().is_none() {
        bail!("input directory is empty: {}", dir.display());
    }
    Ok(())
}

/// Every `.json` file under `dir`, loaded, in sorted order.
///
/// Filenames in the batch are relative to `dir`.
pub fn collect_documents(dir: &Path) -> Vec<BatchDocument> {
    find_json_files(dir)
        .into_iter()
        .map(|path| {
            let filename = path
                .strip_prefix(dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            match load_json_file(&path) {
                Ok(body) => BatchDocument::new(filename, body),
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "document could not be loaded");
                    BatchDocument::failed(filename, e)
                }
            }
        })
        .collect()
}

/// Write `report` to a timestamped file under `dir`.
pub fn save_report(report: &str, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("validation_results_{stamp}.json"));
    std::fs::write(&path, report)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input_dir: PathBuf, schema: PathBuf) -> ValidateArgs {
        ValidateArgs {
            input_dir,
            json_schema: vec![schema],
            save: false,
            output_dir: None,
            strategy: None,
            hint: None,
            jobs: None,
        }
    }

    fn widget_fixture() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();
        let schema = dir.path().join("widget.json");
        std::fs::write(
            &schema,
            r#"{"name": "Widget", "type": "object", "required": ["id"],
                "properties": {"id": {"type": "string"}}}"#,
        )
        .unwrap();
        (dir, data, schema)
    }

    #[test]
    fn all_valid_exits_zero() {
        let (_dir, data, schema) = widget_fixture();
        std::fs::write(data.join("a.json"), r#"{"id": "a"}"#).unwrap();
        assert_eq!(run_validate(&args(data, schema), EngineConfig::default()).unwrap(), 0);
    }

    #[test]
    fn invalid_document_exits_one() {
        let (_dir, data, schema) = widget_fixture();
        std::fs::write(data.join("a.json"), r#"{"id": "a"}"#).unwrap();
        std::fs::write(data.join("b.json"), r#"{"id": 5}"#).unwrap();
        assert_eq!(run_validate(&args(data, schema), EngineConfig::default()).unwrap(), 1);
    }

    #[test]
    fn missing_and_empty_input_dirs_are_errors() {
        let (dir, data, schema) = widget_fixture();
        let err = run_validate(&args(dir.path().join("nope"), schema.clone()), EngineConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        let err = run_validate(&args(data, schema), EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn batch_level_failure_is_an_error() {
        let (dir, data, _schema) = widget_fixture();
        std::fs::write(data.join("a.json"), "{}").unwrap();
        let orphan = dir.path().join("orphan.json");
        std::fs::write(&orphan, r#"{"name": "o", "properties": {"x": {"$ref": "gone.json"}}}"#)
            .unwrap();
        let err = run_validate(&args(data, orphan), EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("gone.json"));
    }

    #[test]
    fn collect_documents_keeps_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("ok.json"), "{}").unwrap();
        std::fs::write(dir.path().join("bad.json"), "{").unwrap();
        std::fs::write(dir.path().join("empty.json"), "  \n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        std::fs::write(dir.path().join(".hidden.json"), "{}").unwrap();

        let docs = collect_documents(dir.path());
        let names: Vec<&str> = docs.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"bad.json"));
        assert!(names.contains(&"empty.json"));
        let broken = docs.iter().find(|d| d.filename == "bad.json").unwrap();
        assert!(broken.body.is_err());
        let ok = docs.iter().find(|d| d.filename.ends_with("ok.json")).unwrap();
        assert!(ok.body.is_ok());
    }

    #[test]
    fn save_report_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let path = save_report("{}", &out).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("validation_results_"));
        assert!(name.ends_with(".json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }
}
