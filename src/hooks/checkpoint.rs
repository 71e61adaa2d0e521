//! Checkpoint hook for saving the parameter bag periodically

use super::event::Event;
use super::registry::HookRegistry;
use crate::params::ParameterBag;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Saves the parameter bag to a directory whenever it fires.
///
/// Batch events write `<prefix>_<batch>.state.<ext>`, epoch events write
/// `<prefix>_epoch_<epoch>.state.<ext>`.
///
/// # Example
///
/// ```no_run
/// use bucle::hooks::{Checkpoint, Event, HookRegistry};
/// # struct MyEngine;
///
/// let mut hooks: HookRegistry<MyEngine> = HookRegistry::new();
/// Checkpoint::new("backup")
///     .prefix("yolo")
///     .install(&mut hooks, Event::BatchEnd, 500)?;
/// # Ok::<(), bucle::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Checkpoint {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl Checkpoint {
    /// Create checkpoint hook saving to directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "backup".to_string(),
            extension: "json".to_string(),
        }
    }

    /// File name prefix (default `backup`)
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// File extension after `.state.`; `yaml` switches the container format
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Directory checkpoints are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Checkpoint path for a counter value on `event`
    pub fn path_for(&self, event: Event, counter: u64) -> PathBuf {
        let stem = match event {
            Event::BatchStart | Event::BatchEnd => format!("{}_{counter}", self.prefix),
            Event::EpochStart | Event::EpochEnd => format!("{}_epoch_{counter}", self.prefix),
        };
        self.dir.join(format!("{stem}.state.{}", self.extension))
    }

    /// Write `params` for `event`, creating the directory if needed.
    pub fn save(&self, params: &ParameterBag, event: Event) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            Error::io(
                format!("creating checkpoint directory {}", self.dir.display()),
                e,
            )
        })?;

        let path = self.path_for(event, event.counter_value(params));
        params.save(&path)?;
        tracing::info!(path = %path.display(), batch = params.batch(), epoch = params.epoch(), "checkpoint saved");
        Ok(path)
    }

    /// Register this checkpoint on `event` every `stride` occurrences.
    pub fn install<E: 'static>(
        self,
        hooks: &mut HookRegistry<E>,
        event: Event,
        stride: u64,
    ) -> Result<()> {
        hooks.register(event, stride, move |_engine: &mut E, ctx| {
            self.save(ctx.params(), event).map(|_| ())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineContext;
    use crate::params::BATCH;
    use tempfile::TempDir;

    #[test]
    fn test_checkpoint_paths() {
        let cp = Checkpoint::new("/tmp/run").prefix("net");
        assert_eq!(
            cp.path_for(Event::BatchEnd, 42),
            PathBuf::from("/tmp/run/net_42.state.json")
        );
        assert_eq!(
            cp.path_for(Event::EpochEnd, 3),
            PathBuf::from("/tmp/run/net_epoch_3.state.json")
        );

        let cp = cp.extension("yaml");
        assert_eq!(
            cp.path_for(Event::BatchEnd, 1),
            PathBuf::from("/tmp/run/net_1.state.yaml")
        );
    }

    #[test]
    fn test_checkpoint_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let cp = Checkpoint::new(dir.path().join("nested/backup"));

        let mut params = ParameterBag::new();
        params.set("lr", 0.1).unwrap();
        params.increment(BATCH);

        let path = cp.save(&params, Event::BatchEnd).unwrap();
        assert_eq!(path, dir.path().join("nested/backup/backup_1.state.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"lr\""));
    }

    #[test]
    fn test_checkpoint_installed_as_hook() {
        let dir = TempDir::new().unwrap();
        let mut hooks: HookRegistry<()> = HookRegistry::new();
        Checkpoint::new(dir.path())
            .install(&mut hooks, Event::BatchEnd, 2)
            .unwrap();

        let mut ctx = EngineContext::new(ParameterBag::new());
        for _ in 0..4 {
            let batch = ctx.params_mut().increment(BATCH);
            hooks.fire(Event::BatchEnd, batch, &mut (), &mut ctx).unwrap();
        }

        assert!(!dir.path().join("backup_1.state.json").exists());
        assert!(dir.path().join("backup_2.state.json").exists());
        assert!(!dir.path().join("backup_3.state.json").exists());
        assert!(dir.path().join("backup_4.state.json").exists());
    }

    #[test]
    fn test_checkpoint_rejects_zero_stride() {
        let mut hooks: HookRegistry<()> = HookRegistry::new();
        let err = Checkpoint::new("unused")
            .install(&mut hooks, Event::BatchEnd, 0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStride { .. }));
    }
}
