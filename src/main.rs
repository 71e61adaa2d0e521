//! bucle CLI
//!
//! Inspection and validation tools for the bucle training engine.
//!
//! # Usage
//!
//! ```bash
//! # Print a saved parameter bag
//! bucle inspect backup/yolo_500.state.json
//!
//! # Same, as YAML
//! bucle inspect backup/yolo_500.state.json --format yaml
//!
//! # Validate an engine config
//! bucle validate engine.yaml
//! ```

use bucle::cli::{init_tracing, run_command, Cli, LogLevel};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.quiet, cli.verbose));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
