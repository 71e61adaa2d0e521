//! Hook system for training lifecycle events
//!
//! Hooks attach to four events:
//! - `batch_start` / `batch_end`
//! - `epoch_start` / `epoch_end`
//!
//! Each hook carries a stride and fires only when the event's counter is a
//! positive multiple of it.
//!
//! # Example
//!
//! ```rust
//! use bucle::hooks::{Event, HookRegistry};
//! use bucle::EngineContext;
//!
//! struct MyEngine {
//!     losses: Vec<f64>,
//! }
//!
//! let mut hooks: HookRegistry<MyEngine> = HookRegistry::new();
//! hooks.register(Event::BatchEnd, 10, |engine: &mut MyEngine, ctx: &mut EngineContext| {
//!     let mean = engine.losses.iter().sum::<f64>() / engine.losses.len().max(1) as f64;
//!     println!("batch {}: loss {mean:.4}", ctx.batch());
//!     engine.losses.clear();
//!     Ok(())
//! })?;
//! # Ok::<(), bucle::Error>(())
//! ```

mod checkpoint;
mod event;
mod registry;

pub use checkpoint::Checkpoint;
pub use event::Event;
pub use registry::{HookFn, HookRegistry};
