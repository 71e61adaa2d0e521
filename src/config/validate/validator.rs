//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::EngineConfig;

/// Validate an engine configuration
///
/// Checks:
/// - sizes and limits are positive when set
/// - the checkpoint stride is positive and the prefix non-empty
pub fn validate_config(config: &EngineConfig) -> Result<(), ValidationError> {
    if config.mini_batch_size == 0 {
        return Err(ValidationError::InvalidMiniBatchSize(config.mini_batch_size));
    }

    if let Some(batch_size) = config.batch_size.filter(|&n| n == 0) {
        return Err(ValidationError::InvalidBatchSize(batch_size));
    }

    if let Some(max_batches) = config.max_batches.filter(|&n| n == 0) {
        return Err(ValidationError::InvalidMaxBatches(max_batches));
    }

    if let Some(max_epochs) = config.max_epochs.filter(|&n| n == 0) {
        return Err(ValidationError::InvalidMaxEpochs(max_epochs));
    }

    if let Some(checkpoint) = &config.checkpoint {
        if checkpoint.every == 0 {
            return Err(ValidationError::InvalidCheckpointInterval(checkpoint.every));
        }
        if checkpoint.prefix.trim().is_empty() {
            return Err(ValidationError::EmptyCheckpointPrefix);
        }
    }

    Ok(())
}

impl EngineConfig {
    /// Validate this configuration. See [`validate_config`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_config(self)
    }
}
