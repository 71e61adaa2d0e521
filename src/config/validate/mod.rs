//! Configuration validation
//!
//! Validates engine configurations before an engine is built from them.

mod error;
mod validator;


pub use error::ValidationError;
pub use validator::validate_config;
