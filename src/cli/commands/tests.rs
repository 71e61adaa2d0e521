//! CLI command tests

use super::*;
use crate::cli::LogLevel;
use crate::config::*;
use crate::params::ParameterBag;
use crate::Error;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn saved_state(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("run.state.json");
    let mut params = ParameterBag::new();
    params.set("lr", 0.01).unwrap();
    params.set("_cache", "scratch").unwrap();
    params.save(&path).unwrap();
    path
}

#[test]
fn test_validate_command_basic() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "engine.yaml", "mini_batch_size: 4\nmax_epochs: 2\n");

    let result = validate::run_validate(ValidateArgs { config }, LogLevel::Quiet);
    assert!(result.is_ok());
}

#[test]
fn test_validate_command_rejects_invalid() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "engine.yaml", "checkpoint:\n  dir: out\n  every: 0\n");

    let err = validate::run_validate(ValidateArgs { config }, LogLevel::Quiet).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::InvalidCheckpointInterval(0))
    ));
}

#[test]
fn test_format_loop_info() {
    let config = EngineConfig {
        mini_batch_size: 4,
        max_batches: Some(1000),
        ..Default::default()
    };
    let info = validate::format_loop_info(&config);
    assert!(info.contains("Mini-batch size: 4"));
    assert!(info.contains("Max batches: 1000 (via limits_reached)"));
    assert!(info.contains("Device: cpu"));
    assert!(!info.contains("Max epochs"));
    assert!(validate::format_checkpoint_info(&config).is_none());
}

#[test]
fn test_inspect_command_basic() {
    let dir = TempDir::new().unwrap();
    let path = saved_state(&dir);

    let args = InspectArgs {
        path,
        format: OutputFormat::Text,
    };
    assert!(inspect::run_inspect(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_inspect_missing_file() {
    let args = InspectArgs {
        path: PathBuf::from("/nonexistent/run.state.json"),
        format: OutputFormat::Text,
    };
    let err = inspect::run_inspect(args, LogLevel::Quiet).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_format_state_leaves_out_transient_entries() {
    let dir = TempDir::new().unwrap();
    let mut params = ParameterBag::new();
    params.load(saved_state(&dir)).unwrap();

    let text = inspect::format_state(&params, OutputFormat::Text).unwrap();
    assert!(text.contains("lr = 0.01"));
    assert!(!text.contains("cache"));

    let yaml = inspect::format_state(&params, OutputFormat::Yaml).unwrap();
    assert!(yaml.contains("lr: 0.01"));
    assert_eq!(
        inspect::format_counters(&params),
        "  batch: 0  epoch: 0  entries: 3"
    );
}

#[test]
fn test_run_command_dispatch() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "engine.yaml", "{}\n");
    let cli = parse_args(["bucle", "validate", config.to_str().unwrap(), "--quiet"]).unwrap();
    assert!(run_command(cli).is_ok());
}
