//! Engine trait: the extension points of the training loop

use super::context::EngineContext;
use crate::hooks::HookRegistry;
use crate::Result;

/// Training logic driven by a [`TrainingEngine`](super::TrainingEngine).
///
/// `process_batch` runs once per item and typically accumulates gradients;
/// `train_batch` runs once per mini-batch and applies the update. The other
/// methods have no-op defaults.
pub trait Engine: Sized {
    /// Item type pulled from the data source
    type Item;

    /// Verify the engine is complete; called once before the first run.
    fn check(&self) -> Result<()> {
        Ok(())
    }

    /// Hooks this engine always carries; called once at construction.
    fn register_hooks(&self, _hooks: &mut HookRegistry<Self>) -> Result<()> {
        Ok(())
    }

    /// Called once when the engine first starts running.
    fn start(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Handle one item of the current mini-batch.
    fn process_batch(&mut self, ctx: &mut EngineContext, item: Self::Item) -> Result<()>;

    /// Apply the update for the mini-batch just processed.
    fn train_batch(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// Stop condition, checked once after every completed batch.
    ///
    /// An epoch ending with that batch is already closed when this runs.
    fn quit(&mut self, _ctx: &EngineContext) -> bool {
        false
    }
}
