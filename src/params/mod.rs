//! Parameter bag: training hyperparameters and state in one container
//!
//! The bag stores three kinds of entries (see [`Param`]):
//! - plain values, saved as they are
//! - [`Stateful`] objects, saved through their own `state`/`load_state`
//! - opaque objects, which can only live in transient entries
//!
//! Names starting with `_` are transient: they are stored under the name
//! without the marker and left out of saved state.
//!
//! # Example
//!
//! ```
//! use bucle::{ParameterBag, Param};
//!
//! let mut params = ParameterBag::new();
//! params.set("batch_size", 64)?;
//! params.set("_loader", Param::object(vec![1, 2, 3]))?;
//!
//! let saved = params.to_mapping()?;
//! assert!(saved.contains_key("batch_size"));
//! assert!(!saved.contains_key("loader"));
//! # Ok::<(), bucle::Error>(())
//! ```

mod bag;
mod param;
mod persist;


pub use bag::{ParameterBag, BATCH, EPOCH, PRIVATE_MARKER};
pub use param::{Device, Param, Stateful};
