//! Loading engine configuration from YAML

use super::schema::EngineConfig;
use super::validate::validate_config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load and validate an engine configuration from a YAML file
///
/// # Example
///
/// ```no_run
/// use bucle::config::load_config;
///
/// let config = load_config("engine.yaml")?;
/// println!("mini-batch size: {}", config.mini_batch_size);
/// # Ok::<(), bucle::Error>(())
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<EngineConfig> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::io(
            format!("reading config file {}", config_path.as_ref().display()),
            e,
        )
    })?;

    let config = EngineConfig::from_yaml_str(&yaml_content)?;
    tracing::debug!(path = %config_path.as_ref().display(), "config loaded");
    Ok(config)
}

impl EngineConfig {
    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml).map_err(|e| Error::Config {
            message: format!("Failed to parse YAML config: {e}"),
        })?;
        validate_config(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_config() {
        let yaml = r"
mini_batch_size: 4
max_epochs: 3
checkpoint:
  dir: ./backup
  every: 50
";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.mini_batch_size, 4);
        assert_eq!(config.max_epochs, Some(3));
        assert_eq!(config.checkpoint.map(|c| c.every), Some(50));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/nonexistent/engine.yaml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = EngineConfig::from_yaml_str("mini_batch_size: [not a number").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let err = EngineConfig::from_yaml_str("mini_batch_size: 0").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidMiniBatchSize(0))
        ));
    }
}
