//! Core ParameterBag struct and attribute access

use super::param::{Device, Param, Stateful};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Prefix that keeps an attribute out of saved state.
pub const PRIVATE_MARKER: char = '_';

/// Reserved counter: completed training batches.
pub const BATCH: &str = "batch";

/// Reserved counter: completed passes over the data source.
pub const EPOCH: &str = "epoch";

pub(crate) struct Entry {
    pub(crate) param: Param,
    pub(crate) transient: bool,
}

/// Mutable, introspectable store of training parameters and state.
///
/// Holds hyperparameters, collaborators (network, optimizer) and the two
/// counters the engine advances. Names set with a leading `_` are stored
/// without it and are skipped by [`ParameterBag::save`].
///
/// # Example
///
/// ```
/// use bucle::ParameterBag;
///
/// let mut params = ParameterBag::new();
/// params.set("lr", 0.01)?;
/// params.set("_workers", 4)?;
///
/// assert_eq!(params.get_as::<f64>("lr")?, 0.01);
/// assert!(params.is_transient("workers")?);
/// assert_eq!(params.batch(), 0);
/// # Ok::<(), bucle::Error>(())
/// ```
pub struct ParameterBag {
    pub(crate) entries: BTreeMap<String, Entry>,
}

/// Split a user-facing name into the stored key and its transient flag.
pub(crate) fn split_name(name: &str) -> Result<(&str, bool)> {
    let (key, transient) = match name.strip_prefix(PRIVATE_MARKER) {
        Some(stripped) => (stripped, true),
        None => (name, false),
    };
    if key.is_empty() {
        return Err(Error::Config {
            message: format!("'{name}' is not a valid attribute name"),
        });
    }
    Ok((key, transient))
}

fn is_reserved(key: &str) -> bool {
    key == BATCH || key == EPOCH
}

impl ParameterBag {
    /// Create a bag holding only the two counters, both at zero.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        for counter in [BATCH, EPOCH] {
            entries.insert(
                counter.to_string(),
                Entry {
                    param: Param::Value(Value::from(0u64)),
                    transient: false,
                },
            );
        }
        Self { entries }
    }

    /// Store `param` under `name`.
    ///
    /// A leading `_` marks the entry transient and is stripped from the key.
    /// Replacing an entry takes the transient flag of the new name.
    pub fn set(&mut self, name: &str, param: impl Into<Param>) -> Result<()> {
        let (key, transient) = split_name(name)?;
        if is_reserved(key) {
            return Err(Error::Reserved {
                name: key.to_string(),
            });
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                param: param.into(),
                transient,
            },
        );
        Ok(())
    }

    /// Store any serializable value as a plain entry.
    pub fn set_value<T: Serialize>(&mut self, name: &str, value: T) -> Result<()> {
        self.set(name, Param::value(value)?)
    }

    /// Store an object that persists through its own state contract.
    pub fn set_state<T: Stateful>(&mut self, name: &str, obj: T) -> Result<()> {
        self.set(name, Param::state(obj))
    }

    /// Store an opaque object.
    pub fn set_object<T: Any>(&mut self, name: &str, obj: T) -> Result<()> {
        self.set(name, Param::object(obj))
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Result<&Param> {
        self.entries
            .get(name)
            .map(|e| &e.param)
            .ok_or_else(|| Error::attribute(name))
    }

    /// Look up an entry mutably.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Param> {
        self.entries
            .get_mut(name)
            .map(|e| &mut e.param)
            .ok_or_else(|| Error::attribute(name))
    }

    /// Borrow a plain value.
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.get(name)?
            .as_value()
            .ok_or_else(|| Error::mismatch(name, "a plain value"))
    }

    /// Decode a plain value into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.value(name)?;
        serde_json::from_value(value.clone())
            .map_err(|_| Error::mismatch(name, std::any::type_name::<T>()))
    }

    /// Borrow a stateful entry as its concrete type.
    pub fn state<T: Stateful>(&self, name: &str) -> Result<&T> {
        let param = self.get(name)?;
        if !matches!(param, Param::State(_)) {
            return Err(Error::mismatch(name, "a stateful object"));
        }
        param
            .downcast_ref()
            .ok_or_else(|| Error::mismatch(name, std::any::type_name::<T>()))
    }

    /// Mutable variant of [`ParameterBag::state`].
    pub fn state_mut<T: Stateful>(&mut self, name: &str) -> Result<&mut T> {
        let param = self.get_mut(name)?;
        if !matches!(param, Param::State(_)) {
            return Err(Error::mismatch(name, "a stateful object"));
        }
        param
            .downcast_mut()
            .ok_or_else(|| Error::mismatch(name, std::any::type_name::<T>()))
    }

    /// Borrow an opaque entry as its concrete type.
    pub fn object<T: Any>(&self, name: &str) -> Result<&T> {
        let param = self.get(name)?;
        if !matches!(param, Param::Object(_)) {
            return Err(Error::mismatch(name, "an opaque object"));
        }
        param
            .downcast_ref()
            .ok_or_else(|| Error::mismatch(name, std::any::type_name::<T>()))
    }

    /// Mutable variant of [`ParameterBag::object`].
    pub fn object_mut<T: Any>(&mut self, name: &str) -> Result<&mut T> {
        let param = self.get_mut(name)?;
        if !matches!(param, Param::Object(_)) {
            return Err(Error::mismatch(name, "an opaque object"));
        }
        param
            .downcast_mut()
            .ok_or_else(|| Error::mismatch(name, std::any::type_name::<T>()))
    }

    /// Remove an entry and hand it back. Counters cannot be removed.
    pub fn remove(&mut self, name: &str) -> Result<Param> {
        if is_reserved(name) {
            return Err(Error::Reserved {
                name: name.to_string(),
            });
        }
        self.entries
            .remove(name)
            .map(|e| e.param)
            .ok_or_else(|| Error::attribute(name))
    }

    /// Check whether an entry exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether the entry is excluded from saved state.
    pub fn is_transient(&self, name: &str) -> Result<bool> {
        self.entries
            .get(name)
            .map(|e| e.transient)
            .ok_or_else(|| Error::attribute(name))
    }

    /// Number of entries, counters included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the counters are always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), &e.param))
    }

    /// Completed training batches.
    pub fn batch(&self) -> u64 {
        self.counter(BATCH)
    }

    /// Completed passes over the data source.
    pub fn epoch(&self) -> u64 {
        self.counter(EPOCH)
    }

    fn counter(&self, name: &str) -> u64 {
        self.entries
            .get(name)
            .and_then(|e| e.param.as_value())
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Advance a counter by one and return the new value.
    pub(crate) fn increment(&mut self, name: &'static str) -> u64 {
        let next = self.counter(name) + 1;
        self.set_counter(name, next);
        next
    }

    pub(crate) fn set_counter(&mut self, name: &str, value: u64) {
        self.entries.insert(
            name.to_string(),
            Entry {
                param: Param::Value(Value::from(value)),
                transient: false,
            },
        );
    }

    /// Move every stateful entry, transient ones included, to `device`.
    pub fn to_device(&mut self, device: &Device) -> Result<()> {
        for entry in self.entries.values_mut() {
            if let Param::State(obj) = &mut entry.param {
                obj.to_device(device)?;
            }
        }
        Ok(())
    }

    /// Deterministic listing of every entry, transient ones marked.
    pub fn describe(&self) -> String {
        let mut out = String::from("ParameterBag(\n");
        for (key, entry) in &self.entries {
            out.push_str(&format!("  {key} = {}", entry.param.summary()));
            if entry.transient {
                out.push_str(" (transient)");
            }
            out.push('\n');
        }
        out.push(')');
        out
    }
}

impl Default for ParameterBag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParameterBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for ParameterBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, e)| (k, &e.param)))
            .finish()
    }
}
