//! CLI command implementations

mod inspect;
mod validate;

#[cfg(test)]
mod tests;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};
use crate::Result;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);

    match cli.command {
        Command::Inspect(args) => inspect::run_inspect(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
    }
}
