//! Training engine: the state machine driving the loop
//!
//! The engine pulls items from a [`DataSource`](crate::data::DataSource),
//! feeds them to [`Engine::process_batch`] in groups of `mini_batch_size`,
//! calls [`Engine::train_batch`] once per group and fires hooks at batch and
//! epoch boundaries:
//!
//! ```text
//! epoch_start(e+1)
//!   batch_start(b+1) → process × M → train → batch += 1 → batch_end(b)
//!   ...
//! epoch += 1 → epoch_end(e)
//! ```
//!
//! An epoch boundary ends the current mini-batch early, so the last batch of
//! an epoch may be short.

mod context;
mod core;
mod fn_engine;
mod result;
mod run_loop;
mod traits;


pub use context::{EngineContext, EngineState};
pub use core::{EngineBuilder, TrainingEngine};
pub use fn_engine::FnEngine;
pub use result::{RunSummary, StopReason};
pub use traits::Engine;
