//! Declarative engine configuration
//!
//! An [`EngineConfig`] sets the mini-batch size, run limits, device and
//! periodic checkpointing in one YAML file. Pass it to
//! [`EngineBuilder::config`](crate::engine::EngineBuilder::config).

mod cli;
mod loader;
mod schema;
mod validate;

pub use cli::{parse_args, Cli, Command, InspectArgs, OutputFormat, ValidateArgs};
pub use loader::load_config;
pub use schema::{CheckpointSpec, EngineConfig};
pub use validate::{validate_config, ValidationError};
