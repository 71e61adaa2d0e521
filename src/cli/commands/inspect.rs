//! Inspect command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{InspectArgs, OutputFormat};
use crate::io::StateFormat;
use crate::params::ParameterBag;
use crate::Result;

/// Render a saved bag in the requested format
pub fn format_state(params: &ParameterBag, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(params.describe()),
        OutputFormat::Json => StateFormat::Json.encode(&params.to_mapping()?),
        OutputFormat::Yaml => StateFormat::Yaml.encode(&params.to_mapping()?),
    }
}

/// One-line counter summary
pub fn format_counters(params: &ParameterBag) -> String {
    format!(
        "  batch: {}  epoch: {}  entries: {}",
        params.batch(),
        params.epoch(),
        params.len()
    )
}

pub fn run_inspect(args: InspectArgs, level: LogLevel) -> Result<()> {
    let mut params = ParameterBag::new();
    params.load(&args.path)?;

    log(
        level,
        LogLevel::Verbose,
        &format!("State file: {}", args.path.display()),
    );
    log(level, LogLevel::Verbose, &format_counters(&params));
    log(level, LogLevel::Normal, &format_state(&params, args.format)?);
    Ok(())
}
