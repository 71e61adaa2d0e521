//! Hook registry for dispatching lifecycle events

use super::event::Event;
use crate::engine::EngineContext;
use crate::{Error, Result};
use std::fmt;
use std::num::NonZeroU64;

/// Callable fired at a lifecycle event.
///
/// Receives the engine implementation and the engine context (parameter bag,
/// engine attributes, counters).
pub type HookFn<E> = Box<dyn FnMut(&mut E, &mut EngineContext) -> Result<()>>;

struct Hook<E> {
    event: Event,
    stride: NonZeroU64,
    callback: HookFn<E>,
}

/// Ordered hooks keyed by event and stride.
///
/// A hook registered with stride `n` fires whenever the event's counter is a
/// positive multiple of `n`. Hooks on the same event fire in registration
/// order.
pub struct HookRegistry<E> {
    hooks: Vec<Hook<E>>,
}

impl<E> HookRegistry<E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register `callback` for `event`, firing every `stride` occurrences.
    ///
    /// Fails with [`Error::InvalidStride`] when `stride` is zero.
    pub fn register<F>(&mut self, event: Event, stride: u64, callback: F) -> Result<()>
    where
        F: FnMut(&mut E, &mut EngineContext) -> Result<()> + 'static,
    {
        let stride = NonZeroU64::new(stride).ok_or(Error::InvalidStride { stride })?;
        self.hooks.push(Hook {
            event,
            stride,
            callback: Box::new(callback),
        });
        Ok(())
    }

    /// Register `callback` for every occurrence of `event`.
    pub fn on<F>(&mut self, event: Event, callback: F)
    where
        F: FnMut(&mut E, &mut EngineContext) -> Result<()> + 'static,
    {
        self.hooks.push(Hook {
            event,
            stride: NonZeroU64::MIN,
            callback: Box::new(callback),
        });
    }

    /// Fire every hook on `event` whose stride divides `counter`.
    ///
    /// Nothing fires for a counter of zero. The first hook error stops
    /// dispatch and is returned. Returns how many hooks ran.
    pub fn fire(
        &mut self,
        event: Event,
        counter: u64,
        engine: &mut E,
        ctx: &mut EngineContext,
    ) -> Result<usize> {
        if counter == 0 {
            return Ok(0);
        }

        let mut fired = 0;
        for hook in &mut self.hooks {
            if hook.event == event && counter.is_multiple_of(hook.stride.get()) {
                (hook.callback)(engine, ctx)?;
                fired += 1;
            }
        }
        Ok(fired)
    }

    /// Number of hooks registered on `event`.
    pub fn count(&self, event: Event) -> usize {
        self.hooks.iter().filter(|h| h.event == event).count()
    }

    /// Check if no hooks are registered
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get number of hooks
    pub fn len(&self) -> usize {
        self.hooks.len()
    }
}

impl<E> Default for HookRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for HookRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| (h.event, h.stride.get())))
            .finish()
    }
}
