//! Closure-backed engine

use super::context::EngineContext;
use super::traits::Engine;
use crate::{Error, Result};
use std::fmt;

type StartFn = Box<dyn FnMut(&mut EngineContext) -> Result<()>>;
type ProcessFn<T> = Box<dyn FnMut(&mut EngineContext, T) -> Result<()>>;
type TrainFn = Box<dyn FnMut(&mut EngineContext) -> Result<()>>;
type QuitFn = Box<dyn FnMut(&EngineContext) -> bool>;

/// [`Engine`] assembled from closures at runtime.
///
/// `process_batch` and `train_batch` must be supplied; the engine reports
/// [`Error::MissingExtension`] on its first `run()` otherwise, before any
/// data is pulled.
pub struct FnEngine<T> {
    start: Option<StartFn>,
    process: Option<ProcessFn<T>>,
    train: Option<TrainFn>,
    quit: Option<QuitFn>,
}

impl<T> FnEngine<T> {
    /// Engine with no extension points set
    pub fn new() -> Self {
        Self {
            start: None,
            process: None,
            train: None,
            quit: None,
        }
    }

    /// Called once when the engine first starts
    pub fn on_start(mut self, f: impl FnMut(&mut EngineContext) -> Result<()> + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    /// Handle one item
    pub fn on_process(
        mut self,
        f: impl FnMut(&mut EngineContext, T) -> Result<()> + 'static,
    ) -> Self {
        self.process = Some(Box::new(f));
        self
    }

    /// Apply the update for a mini-batch
    pub fn on_train(mut self, f: impl FnMut(&mut EngineContext) -> Result<()> + 'static) -> Self {
        self.train = Some(Box::new(f));
        self
    }

    /// Stop condition
    pub fn on_quit(mut self, f: impl FnMut(&EngineContext) -> bool + 'static) -> Self {
        self.quit = Some(Box::new(f));
        self
    }
}

impl<T> Default for FnEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Engine for FnEngine<T> {
    type Item = T;

    fn check(&self) -> Result<()> {
        if self.process.is_none() {
            return Err(Error::MissingExtension {
                name: "process_batch",
            });
        }
        if self.train.is_none() {
            return Err(Error::MissingExtension {
                name: "train_batch",
            });
        }
        Ok(())
    }

    fn start(&mut self, ctx: &mut EngineContext) -> Result<()> {
        match &mut self.start {
            Some(f) => f(ctx),
            None => Ok(()),
        }
    }

    fn process_batch(&mut self, ctx: &mut EngineContext, item: T) -> Result<()> {
        match &mut self.process {
            Some(f) => f(ctx, item),
            None => Err(Error::MissingExtension {
                name: "process_batch",
            }),
        }
    }

    fn train_batch(&mut self, ctx: &mut EngineContext) -> Result<()> {
        match &mut self.train {
            Some(f) => f(ctx),
            None => Err(Error::MissingExtension {
                name: "train_batch",
            }),
        }
    }

    fn quit(&mut self, ctx: &EngineContext) -> bool {
        self.quit.as_mut().is_some_and(|f| f(ctx))
    }
}

impl<T> fmt::Debug for FnEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEngine")
            .field("start", &self.start.is_some())
            .field("process", &self.process.is_some())
            .field("train", &self.train.is_some())
            .field("quit", &self.quit.is_some())
            .finish()
    }
}
