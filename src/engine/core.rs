//! Core TrainingEngine struct, builder and accessors

use super::context::{EngineContext, EngineState};
use super::traits::Engine;
use crate::config::EngineConfig;
use crate::data::DataSource;
use crate::hooks::{Event, HookRegistry};
use crate::params::{Param, ParameterBag};
use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// A pull already taken from the data source, replayed on the next fetch.
///
/// Items come from the look-ahead after a full mini-batch; the signals come
/// from either the look-ahead or a mini-batch cut short.
pub(crate) enum Pending<T> {
    Item(T),
    EndOfEpoch,
    Exhausted,
}

impl<T> Pending<T> {
    fn label(&self) -> &'static str {
        match self {
            Self::Item(_) => "item",
            Self::EndOfEpoch => "end_of_epoch",
            Self::Exhausted => "exhausted",
        }
    }
}

/// State machine driving batches, mini-batches and epochs
///
/// Owns the training logic (an [`Engine`]), the data source, the hook
/// registry and the [`EngineContext`] holding the parameter bag.
///
/// # Example
///
/// ```
/// use bucle::{Epochs, FnEngine, StopReason, TrainingEngine};
///
/// let logic = FnEngine::new()
///     .on_process(|ctx, x: f64| {
///         let sum = ctx.params().get_as::<f64>("sum")?;
///         ctx.params_mut().set("sum", sum + x)
///     })
///     .on_train(|_| Ok(()));
///
/// let mut engine = TrainingEngine::builder(logic, Epochs::new([1.0, 2.0, 3.0]).passes(1))
///     .mini_batch_size(2)
///     .build()?;
/// engine.params_mut().set("sum", 0.0)?;
///
/// let summary = engine.run()?;
/// assert_eq!(summary.stop_reason, StopReason::Exhausted);
/// assert_eq!(engine.context().batch(), 2);
/// assert_eq!(engine.context().epoch(), 1);
/// assert_eq!(engine.params().get_as::<f64>("sum")?, 6.0);
/// # Ok::<(), bucle::Error>(())
/// ```
pub struct TrainingEngine<E: Engine, D> {
    pub(crate) logic: E,
    pub(crate) ctx: EngineContext,
    pub(crate) hooks: HookRegistry<E>,
    pub(crate) data: D,
    pub(crate) pending: Option<Pending<E::Item>>,
    pub(crate) epoch_open: bool,
}

impl<E, D> TrainingEngine<E, D>
where
    E: Engine + 'static,
    D: DataSource<Item = E::Item>,
{
    /// Engine with an empty bag and no options
    pub fn new(logic: E, data: D) -> Result<Self> {
        Self::builder(logic, data).build()
    }

    /// Start building an engine
    pub fn builder(logic: E, data: D) -> EngineBuilder<E, D> {
        EngineBuilder {
            logic,
            data,
            params: ParameterBag::new(),
            attrs: Vec::new(),
            mini_batch_size: None,
            batch_size: None,
            config: None,
        }
    }

    /// Register a hook at runtime. See [`HookRegistry::register`].
    pub fn register<F>(&mut self, event: Event, stride: u64, callback: F) -> Result<()>
    where
        F: FnMut(&mut E, &mut EngineContext) -> Result<()> + 'static,
    {
        self.hooks.register(event, stride, callback)
    }

    /// Register a hook firing on every occurrence of `event`.
    pub fn on<F>(&mut self, event: Event, callback: F)
    where
        F: FnMut(&mut E, &mut EngineContext) -> Result<()> + 'static,
    {
        self.hooks.on(event, callback);
    }

    /// Save the parameter bag to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.ctx.params().save(path)
    }

    /// Restore the parameter bag from `path` in place.
    ///
    /// Stateful entries already in the bag restore through their own state
    /// contract. The next batch fires `epoch_start` again for `epoch + 1`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.ctx.params_mut().load(path)?;
        self.epoch_open = false;
        Ok(())
    }
}

impl<E: Engine, D> TrainingEngine<E, D> {
    /// The hook registry
    pub fn hooks(&self) -> &HookRegistry<E> {
        &self.hooks
    }

    /// The hook registry, mutably
    pub fn hooks_mut(&mut self) -> &mut HookRegistry<E> {
        &mut self.hooks
    }

    /// The engine context
    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// The engine context, mutably
    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    /// The parameter bag
    pub fn params(&self) -> &ParameterBag {
        self.ctx.params()
    }

    /// The parameter bag, mutably
    pub fn params_mut(&mut self) -> &mut ParameterBag {
        self.ctx.params_mut()
    }

    /// Swap in a new bag, returning the old one.
    pub fn replace_params(&mut self, params: ParameterBag) -> ParameterBag {
        self.epoch_open = false;
        self.ctx.replace_params(params)
    }

    /// The training logic
    pub fn logic(&self) -> &E {
        &self.logic
    }

    /// The training logic, mutably
    pub fn logic_mut(&mut self) -> &mut E {
        &mut self.logic
    }

    /// The data source
    pub fn data(&self) -> &D {
        &self.data
    }

    /// The data source, mutably
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Lifecycle state
    pub fn state(&self) -> EngineState {
        self.ctx.state()
    }

    /// Take the engine apart into logic, parameter bag and data source.
    pub fn into_parts(self) -> (E, ParameterBag, D) {
        (self.logic, self.ctx.into_params(), self.data)
    }
}

impl<E: Engine, D> fmt::Debug for TrainingEngine<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainingEngine")
            .field("ctx", &self.ctx)
            .field("hooks", &self.hooks)
            .field("pending", &self.pending.as_ref().map(Pending::label))
            .field("epoch_open", &self.epoch_open)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TrainingEngine`]
pub struct EngineBuilder<E, D> {
    logic: E,
    data: D,
    params: ParameterBag,
    attrs: Vec<(String, Param)>,
    mini_batch_size: Option<u64>,
    batch_size: Option<u64>,
    config: Option<EngineConfig>,
}

impl<E, D> EngineBuilder<E, D>
where
    E: Engine + 'static,
    D: DataSource<Item = E::Item>,
{
    /// Use `params` instead of an empty bag
    pub fn params(mut self, params: ParameterBag) -> Self {
        self.params = params;
        self
    }

    /// Engine attribute; shadows the bag entry of the same name and is never saved
    pub fn attr(mut self, name: impl Into<String>, param: impl Into<Param>) -> Self {
        self.attrs.push((name.into(), param.into()));
        self
    }

    /// Items per training batch
    pub fn mini_batch_size(mut self, size: u64) -> Self {
        self.mini_batch_size = Some(size);
        self
    }

    /// Informational batch size
    pub fn batch_size(mut self, size: u64) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Apply a declarative configuration at build time
    pub fn config(mut self, config: &EngineConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    /// Validate the options, register definition-time hooks and build.
    pub fn build(self) -> Result<TrainingEngine<E, D>> {
        let mut params = self.params;
        if let Some(config) = &self.config {
            config.validate()?;
            config.apply(&mut params)?;
            params.to_device(&config.device)?;
        }

        let mut ctx = EngineContext::new(params);
        for (name, param) in self.attrs {
            ctx.set_attr(&name, param);
        }
        for (name, size) in [
            ("mini_batch_size", self.mini_batch_size),
            ("batch_size", self.batch_size),
        ] {
            if let Some(size) = size {
                if size == 0 {
                    return Err(Error::Config {
                        message: format!("'{name}' must be at least 1"),
                    });
                }
                ctx.set_attr(name, size);
            }
        }

        let mut hooks = HookRegistry::new();
        self.logic.register_hooks(&mut hooks)?;
        if let Some(spec) = self.config.and_then(|c| c.checkpoint) {
            let every = spec.every;
            spec.into_checkpoint()
                .install(&mut hooks, Event::BatchEnd, every)?;
        }

        tracing::debug!(hooks = hooks.len(), "engine built");
        Ok(TrainingEngine {
            logic: self.logic,
            ctx,
            hooks,
            data: self.data,
            pending: None,
            epoch_open: false,
        })
    }
}
