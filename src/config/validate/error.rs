//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid mini-batch size: {0} (must be > 0)")]
    InvalidMiniBatchSize(u64),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(u64),

    #[error("Invalid max batches: {0} (must be > 0)")]
    InvalidMaxBatches(u64),

    #[error("Invalid max epochs: {0} (must be > 0)")]
    InvalidMaxEpochs(u64),

    #[error("Invalid checkpoint interval: {0} (must be > 0)")]
    InvalidCheckpointInterval(u64),

    #[error("Checkpoint prefix cannot be empty")]
    EmptyCheckpointPrefix,
}
