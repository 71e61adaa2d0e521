//! YAML schema for declarative engine configuration

use crate::hooks::Checkpoint;
use crate::params::{Device, ParameterBag};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_mini_batch_size() -> u64 {
    1
}

fn default_every() -> u64 {
    100
}

fn default_prefix() -> String {
    "backup".to_string()
}

/// Engine settings loaded from YAML
///
/// ```yaml
/// batch_size: 64
/// mini_batch_size: 4
/// max_epochs: 10
/// device: cuda:0
/// checkpoint:
///   dir: ./backup
///   every: 500
///   prefix: yolo
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Informational batch size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u64>,

    /// Items per training batch
    #[serde(default = "default_mini_batch_size")]
    pub mini_batch_size: u64,

    /// Batch limit, written to the bag as `max_batches`
    ///
    /// The loop does not enforce it on its own: an engine stops on it by
    /// returning [`EngineContext::limits_reached`](crate::EngineContext::limits_reached)
    /// from `quit`, e.g. `FnEngine::on_quit(EngineContext::limits_reached)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_batches: Option<u64>,

    /// Epoch limit, written to the bag as `max_epochs`
    ///
    /// Enforced only through `limits_reached`, as for `max_batches`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_epochs: Option<u64>,

    /// Device stateful entries are moved to at build time
    #[serde(default)]
    pub device: Device,

    /// Periodic checkpointing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<CheckpointSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: None,
            mini_batch_size: default_mini_batch_size(),
            max_batches: None,
            max_epochs: None,
            device: Device::default(),
            checkpoint: None,
        }
    }
}

impl EngineConfig {
    /// Write the sizes, limits and device into `params` as plain entries.
    pub fn apply(&self, params: &mut ParameterBag) -> Result<()> {
        params.set("mini_batch_size", self.mini_batch_size)?;
        if let Some(batch_size) = self.batch_size {
            params.set("batch_size", batch_size)?;
        }
        if let Some(max_batches) = self.max_batches {
            params.set("max_batches", max_batches)?;
        }
        if let Some(max_epochs) = self.max_epochs {
            params.set("max_epochs", max_epochs)?;
        }
        params.set("device", self.device.to_string())
    }
}

/// Checkpoint hook settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointSpec {
    /// Output directory
    pub dir: PathBuf,

    /// Save every N batches
    #[serde(default = "default_every")]
    pub every: u64,

    /// File name prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl CheckpointSpec {
    /// Build the checkpoint hook these settings describe
    pub fn into_checkpoint(self) -> Checkpoint {
        Checkpoint::new(self.dir).prefix(self.prefix)
    }
}
