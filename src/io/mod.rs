//! Persistence format for parameter bags
//!
//! A saved bag is a single mapping from attribute name to value. JSON is the
//! default container; files ending in `.yaml`/`.yml` are written as YAML.
//! There is no version field.

mod format;

pub use format::StateFormat;
