//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, EngineConfig, ValidateArgs};
use crate::Result;

/// Format loop sizes and limits as a string
pub fn format_loop_info(config: &EngineConfig) -> String {
    let mut lines = vec![format!("  Mini-batch size: {}", config.mini_batch_size)];
    if let Some(batch_size) = config.batch_size {
        lines.push(format!("  Batch size: {batch_size}"));
    }
    if let Some(max_batches) = config.max_batches {
        lines.push(format!("  Max batches: {max_batches} (via limits_reached)"));
    }
    if let Some(max_epochs) = config.max_epochs {
        lines.push(format!("  Max epochs: {max_epochs} (via limits_reached)"));
    }
    lines.push(format!("  Device: {}", config.device));
    lines.join("\n")
}

/// Format checkpoint configuration as a string
pub fn format_checkpoint_info(config: &EngineConfig) -> Option<String> {
    config.checkpoint.as_ref().map(|checkpoint| {
        format!(
            "  Checkpoint:\n    Dir: {}\n    Every: {} batches\n    Prefix: {}",
            checkpoint.dir.display(),
            checkpoint.every,
            checkpoint.prefix
        )
    })
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<()> {
    let config = load_config(&args.config)?;

    log(level, LogLevel::Normal, "✓ Configuration is valid");
    log(level, LogLevel::Verbose, &format_loop_info(&config));
    if let Some(info) = format_checkpoint_info(&config) {
        log(level, LogLevel::Verbose, &info);
    }
    Ok(())
}
