//! Engine context: the bag, engine attributes and lifecycle state

use crate::params::{Param, ParameterBag};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state of a [`TrainingEngine`](super::TrainingEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Constructed, never run
    #[default]
    Idle,
    /// Inside `run()`
    Running,
    /// `run()` returned, by quit, exhaustion or error
    Stopped,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Idle => "idle",
            EngineState::Running => "running",
            EngineState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Everything the engine exposes to extension points and hooks.
///
/// Name lookups go to engine attributes first, then to the parameter bag.
/// Engine attributes are set at construction (or by hooks) and are never
/// saved.
pub struct EngineContext {
    params: ParameterBag,
    attrs: BTreeMap<String, Param>,
    state: EngineState,
}

impl EngineContext {
    /// Create an idle context around `params`
    pub fn new(params: ParameterBag) -> Self {
        Self {
            params,
            attrs: BTreeMap::new(),
            state: EngineState::Idle,
        }
    }

    /// The parameter bag
    pub fn params(&self) -> &ParameterBag {
        &self.params
    }

    /// The parameter bag, mutably
    pub fn params_mut(&mut self) -> &mut ParameterBag {
        &mut self.params
    }

    /// Swap in a new bag, returning the old one.
    pub fn replace_params(&mut self, params: ParameterBag) -> ParameterBag {
        std::mem::replace(&mut self.params, params)
    }

    pub(crate) fn into_params(self) -> ParameterBag {
        self.params
    }

    /// Engine attribute, without falling back to the bag.
    pub fn attr(&self, name: &str) -> Option<&Param> {
        self.attrs.get(name)
    }

    /// Engine attribute, mutably.
    pub fn attr_mut(&mut self, name: &str) -> Option<&mut Param> {
        self.attrs.get_mut(name)
    }

    /// Set an engine attribute, returning the previous one.
    ///
    /// The name is stored verbatim; engine attributes never reach saved
    /// state, so the private marker has no meaning here.
    pub fn set_attr(&mut self, name: &str, param: impl Into<Param>) -> Option<Param> {
        self.attrs.insert(name.to_string(), param.into())
    }

    /// Remove an engine attribute.
    pub fn remove_attr(&mut self, name: &str) -> Option<Param> {
        self.attrs.remove(name)
    }

    /// Check for an engine attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Resolve `name` on the engine attributes, then on the bag.
    ///
    /// Fails with [`Error::Attribute`] when neither defines it.
    pub fn get(&self, name: &str) -> Result<&Param> {
        match self.attrs.get(name) {
            Some(param) => Ok(param),
            None => self.params.get(name),
        }
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Param> {
        match self.attrs.get_mut(name) {
            Some(param) => Ok(param),
            None => self.params.get_mut(name),
        }
    }

    /// Resolve `name` and decode it as a plain value.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .get(name)?
            .as_value()
            .ok_or_else(|| Error::mismatch(name, "a plain value"))?;
        serde_json::from_value(value.clone())
            .map_err(|_| Error::mismatch(name, std::any::type_name::<T>()))
    }

    /// Completed batches
    pub fn batch(&self) -> u64 {
        self.params.batch()
    }

    /// Completed epochs
    pub fn epoch(&self) -> u64 {
        self.params.epoch()
    }

    /// Lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: EngineState) {
        self.state = state;
    }

    /// Items per training batch; 1 when unset.
    ///
    /// A value that is not a positive integer is a configuration error.
    pub fn mini_batch_size(&self) -> Result<u64> {
        Ok(self.positive("mini_batch_size")?.unwrap_or(1))
    }

    /// Informational batch size, if set.
    pub fn batch_size(&self) -> Result<Option<u64>> {
        self.positive("batch_size")
    }

    fn positive(&self, name: &str) -> Result<Option<u64>> {
        let param = match self.get(name) {
            Ok(param) => param,
            Err(Error::Attribute { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        match param.as_value().and_then(Value::as_u64) {
            Some(n) if n > 0 => Ok(Some(n)),
            _ => Err(Error::Config {
                message: format!("'{name}' must be a positive integer, got {}", param.summary()),
            }),
        }
    }

    /// Whether `max_batches` or `max_epochs` in the bag has been reached.
    pub fn limits_reached(&self) -> bool {
        let limit = |name: &str| self.params.value(name).ok().and_then(Value::as_u64);
        limit("max_batches").is_some_and(|max| self.batch() >= max)
            || limit("max_epochs").is_some_and(|max| self.epoch() >= max)
    }
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("state", &self.state)
            .field("attrs", &self.attrs.keys().collect::<Vec<_>>())
            .field("params", &self.params)
            .finish()
    }
}
