//! CLI module for bucle
//!
//! This module contains the CLI command handlers and utilities.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{init_tracing, LogLevel};

// Re-export Cli from config for convenience
pub use crate::config::Cli;
