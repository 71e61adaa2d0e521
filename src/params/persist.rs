//! Saving and restoring a ParameterBag

use super::bag::{split_name, Entry, ParameterBag, BATCH, EPOCH};
use super::param::Param;
use crate::io::StateFormat;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

impl ParameterBag {
    /// Mapping that [`ParameterBag::save`] writes.
    ///
    /// Plain entries are stored as is, stateful entries through
    /// [`Stateful::state`](super::Stateful::state). Transient entries are
    /// skipped. A persistent opaque object makes this fail.
    pub fn to_mapping(&self) -> Result<Map<String, Value>> {
        let mut mapping = Map::new();
        for (key, entry) in &self.entries {
            if entry.transient {
                continue;
            }
            let value = match &entry.param {
                Param::Value(v) => v.clone(),
                Param::State(obj) => obj.state()?,
                Param::Object(_) => {
                    return Err(Error::NotSerializable { name: key.clone() });
                }
            };
            mapping.insert(key.clone(), value);
        }
        Ok(mapping)
    }

    /// Save every persistent entry to `path`.
    ///
    /// The container format follows the extension (see [`StateFormat`]).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bucle::ParameterBag;
    ///
    /// let mut params = ParameterBag::new();
    /// params.set("lr", 0.001)?;
    /// params.save("backup/final.state.json")?;
    /// # Ok::<(), bucle::Error>(())
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mapping = self.to_mapping()?;
        let data = StateFormat::from_path(path).encode(&mapping)?;

        fs::write(path, data)
            .map_err(|e| Error::io(format!("writing state to {}", path.display()), e))?;

        tracing::debug!(path = %path.display(), entries = mapping.len(), "saved parameters");
        Ok(())
    }

    /// Apply a saved mapping to this bag.
    ///
    /// Keys naming an existing stateful entry are restored in place through
    /// [`Stateful::load_state`](super::Stateful::load_state); every other key
    /// is assigned as a plain value, creating the entry if needed.
    ///
    /// Keys are applied in sorted order and a failure stops there: entries
    /// applied before the failing key keep their new values.
    pub fn load_mapping(&mut self, mapping: Map<String, Value>) -> Result<()> {
        for (key, value) in mapping {
            if key == BATCH || key == EPOCH {
                let count = value.as_u64().ok_or_else(|| {
                    Error::deserialization(format!(
                        "counter '{key}' must be a non-negative integer, found {value}"
                    ))
                })?;
                self.set_counter(&key, count);
                continue;
            }

            if let Some(Entry {
                param: Param::State(obj),
                ..
            }) = self.entries.get_mut(&key)
            {
                obj.load_state(value)?;
                continue;
            }

            let (name, transient) = split_name(&key)
                .map_err(|_| Error::deserialization(format!("invalid attribute name '{key}'")))?;
            self.entries.insert(
                name.to_string(),
                Entry {
                    param: Param::Value(value),
                    transient,
                },
            );
        }
        Ok(())
    }

    /// Restore entries from a file written by [`ParameterBag::save`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading state from {}", path.display()), e))?;
        let mapping = StateFormat::from_path(path).decode(&content)?;

        tracing::debug!(path = %path.display(), entries = mapping.len(), "loading parameters");
        self.load_mapping(mapping)
    }

    /// Build a bag from a saved file plus entries that were never saved.
    ///
    /// Stateful extras are installed first so the file restores their state
    /// (a freshly built network getting its weights back). All other extras
    /// are applied after loading and take precedence over the file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bucle::{Param, ParameterBag};
    ///
    /// let params = ParameterBag::from_file(
    ///     "backup/final.state.json",
    ///     [("_workers", Param::from(8))],
    /// )?;
    /// # Ok::<(), bucle::Error>(())
    /// ```
    pub fn from_file<K, I>(path: impl AsRef<Path>, extras: I) -> Result<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Param)>,
    {
        let mut bag = Self::new();
        let mut overlay = Vec::new();

        for (name, param) in extras {
            if matches!(param, Param::State(_)) {
                bag.set(name.as_ref(), param)?;
            } else {
                overlay.push((name, param));
            }
        }

        bag.load(path)?;

        for (name, param) in overlay {
            bag.set(name.as_ref(), param)?;
        }
        Ok(bag)
    }
}
