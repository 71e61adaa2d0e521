//! CLI argument parsing
//!
//! ```bash
//! bucle inspect backup/yolo_500.state.json
//! bucle inspect backup/yolo_500.state.json --format yaml
//! bucle validate engine.yaml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bucle: training-loop orchestration engine
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "bucle")]
#[command(version)]
#[command(about = "Inspect saved training state and validate engine configuration")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the contents of a saved state file
    Inspect(InspectArgs),

    /// Validate an engine configuration file
    Validate(ValidateArgs),
}

/// Arguments for the inspect command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InspectArgs {
    /// Path to a saved state file (.json, .yaml)
    #[arg(value_name = "STATE")]
    pub path: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Output format for the inspect command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {s}. Valid formats: text, json, yaml"
            )),
        }
    }
}

/// Parse command line arguments
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
