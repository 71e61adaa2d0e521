//! The batch / mini-batch / epoch loop

use super::context::EngineState;
use super::core::{Pending, TrainingEngine};
use super::result::{RunSummary, StopReason};
use super::traits::Engine;
use crate::data::{DataSource, Fetch};
use crate::hooks::Event;
use crate::params::{BATCH, EPOCH};
use crate::Result;

/// Work done during one `run()` call
#[derive(Default)]
struct Tally {
    batches: u64,
    items: u64,
}

impl<E, D> TrainingEngine<E, D>
where
    E: Engine + 'static,
    D: DataSource<Item = E::Item>,
{
    /// Run until `quit()` returns true or the data source is exhausted.
    ///
    /// The first call checks the engine and calls `start()`; later calls
    /// resume from the current counters without calling `start()` again.
    /// Any error from the data source, an extension point or a hook aborts
    /// the loop and leaves the engine stopped.
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut tally = Tally::default();
        let outcome = self.run_until_stop(&mut tally);
        if self.ctx.state() == EngineState::Running {
            self.ctx.set_state(EngineState::Stopped);
        }

        let stop_reason = match outcome {
            Ok(reason) => reason,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    batch = self.ctx.batch(),
                    epoch = self.ctx.epoch(),
                    "training aborted"
                );
                return Err(e);
            }
        };

        let summary = RunSummary {
            batches: tally.batches,
            items: tally.items,
            stop_reason,
            batch: self.ctx.batch(),
            epoch: self.ctx.epoch(),
        };
        tracing::info!(
            reason = %summary.stop_reason,
            batches = summary.batches,
            batch = summary.batch,
            epoch = summary.epoch,
            "training stopped"
        );
        Ok(summary)
    }

    fn run_until_stop(&mut self, tally: &mut Tally) -> Result<StopReason> {
        if self.ctx.state() == EngineState::Idle {
            self.logic.check()?;
            self.ctx.set_state(EngineState::Running);
            tracing::info!(
                batch = self.ctx.batch(),
                epoch = self.ctx.epoch(),
                hooks = self.hooks.len(),
                "training started"
            );
            self.logic.start(&mut self.ctx)?;
        } else {
            self.ctx.set_state(EngineState::Running);
            tracing::info!(batch = self.ctx.batch(), epoch = self.ctx.epoch(), "training resumed");
        }

        loop {
            let mini_batch_size = self.ctx.mini_batch_size()?;
            match self.next_fetch()? {
                Fetch::Exhausted => return Ok(StopReason::Exhausted),
                Fetch::EndOfEpoch => self.finish_epoch()?,
                Fetch::Item(first) => {
                    self.run_batch(first, mini_batch_size, tally)?;
                    if self.pending.is_none() {
                        self.look_ahead()?;
                    }
                    if matches!(self.pending, Some(Pending::EndOfEpoch)) {
                        self.pending = None;
                        self.finish_epoch()?;
                    }
                    if self.logic.quit(&self.ctx) {
                        return Ok(StopReason::Quit);
                    }
                }
            }
        }
    }

    fn next_fetch(&mut self) -> Result<Fetch<E::Item>> {
        match self.pending.take() {
            Some(Pending::Item(item)) => Ok(Fetch::Item(item)),
            Some(Pending::EndOfEpoch) => Ok(Fetch::EndOfEpoch),
            Some(Pending::Exhausted) => Ok(Fetch::Exhausted),
            None => self.data.fetch(),
        }
    }

    /// Pull once past a full mini-batch so an epoch boundary right behind it
    /// closes before `quit()` is asked.
    fn look_ahead(&mut self) -> Result<()> {
        self.pending = Some(match self.data.fetch()? {
            Fetch::Item(item) => Pending::Item(item),
            Fetch::EndOfEpoch => Pending::EndOfEpoch,
            Fetch::Exhausted => Pending::Exhausted,
        });
        Ok(())
    }

    /// One training batch: up to `size` items, one weight update.
    fn run_batch(&mut self, first: E::Item, size: u64, tally: &mut Tally) -> Result<()> {
        if !self.epoch_open {
            self.fire(Event::EpochStart)?;
            self.epoch_open = true;
        }
        self.fire(Event::BatchStart)?;

        self.logic.process_batch(&mut self.ctx, first)?;
        let mut processed = 1;
        while processed < size {
            match self.data.fetch()? {
                Fetch::Item(item) => {
                    self.logic.process_batch(&mut self.ctx, item)?;
                    processed += 1;
                }
                Fetch::EndOfEpoch => {
                    self.pending = Some(Pending::EndOfEpoch);
                    break;
                }
                Fetch::Exhausted => {
                    self.pending = Some(Pending::Exhausted);
                    break;
                }
            }
        }
        tally.items += processed;

        self.logic.train_batch(&mut self.ctx)?;
        let batch = self.ctx.params_mut().increment(BATCH);
        tally.batches += 1;
        tracing::debug!(batch, items = processed, "batch trained");

        self.fire(Event::BatchEnd)?;
        Ok(())
    }

    fn finish_epoch(&mut self) -> Result<()> {
        if !self.epoch_open {
            tracing::warn!(
                epoch = self.ctx.epoch() + 1,
                "epoch boundary reached without any batch"
            );
            self.fire(Event::EpochStart)?;
        }
        self.epoch_open = false;

        let epoch = self.ctx.params_mut().increment(EPOCH);
        tracing::debug!(epoch, batch = self.ctx.batch(), "epoch finished");
        self.fire(Event::EpochEnd)?;
        Ok(())
    }

    fn fire(&mut self, event: Event) -> Result<usize> {
        let counter = event.counter_value(self.ctx.params());
        self.hooks
            .fire(event, counter, &mut self.logic, &mut self.ctx)
    }
}
