//! # bucle: training-loop orchestration
//!
//! bucle drives the control flow of a training run and leaves the numerics to
//! you. It provides:
//!
//! - **ParameterBag**: hyperparameters and stateful objects (networks,
//!   optimizers) in one container that saves and restores itself
//! - **Hooks**: callbacks on `batch_start`, `batch_end`, `epoch_start` and
//!   `epoch_end`, each with a stride
//! - **TrainingEngine**: the batch / mini-batch / epoch loop, with pause and
//!   resume through the bag
//!
//! # Example
//!
//! ```
//! use bucle::{Engine, EngineContext, Epochs, Event, Result, TrainingEngine};
//!
//! #[derive(Default)]
//! struct Mean {
//!     sum: f64,
//!     count: u64,
//! }
//!
//! impl Engine for Mean {
//!     type Item = f64;
//!
//!     fn process_batch(&mut self, _ctx: &mut EngineContext, x: f64) -> Result<()> {
//!         self.sum += x;
//!         self.count += 1;
//!         Ok(())
//!     }
//!
//!     fn train_batch(&mut self, ctx: &mut EngineContext) -> Result<()> {
//!         ctx.params_mut().set("mean", self.sum / self.count as f64)
//!     }
//! }
//!
//! let data = Epochs::new([1.0, 2.0, 3.0, 4.0]).passes(2);
//! let mut engine = TrainingEngine::builder(Mean::default(), data)
//!     .mini_batch_size(2)
//!     .build()?;
//! engine.register(Event::EpochEnd, 1, |_, ctx| {
//!     println!("epoch {} done", ctx.epoch());
//!     Ok(())
//! })?;
//!
//! let summary = engine.run()?;
//! assert_eq!(summary.batch, 4);
//! assert_eq!(engine.params().get_as::<f64>("mean")?, 2.5);
//! # Ok::<(), bucle::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod io;
pub mod params;

pub use config::{load_config, EngineConfig};
pub use data::{DataSource, Epochs, Fetch, Stream};
pub use engine::{
    Engine, EngineBuilder, EngineContext, EngineState, FnEngine, RunSummary, StopReason,
    TrainingEngine,
};
pub use error::{Error, ErrorKind, Result};
pub use hooks::{Checkpoint, Event, HookRegistry};
pub use io::StateFormat;
pub use params::{Device, Param, ParameterBag, Stateful};
