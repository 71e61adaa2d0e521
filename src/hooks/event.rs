//! Lifecycle events hooks can attach to

use crate::params::{ParameterBag, BATCH, EPOCH};
use std::fmt;

/// Point in the training loop where hooks fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Before the first mini-batch of a batch; sees the batch number about to run
    BatchStart,
    /// After the weight update; sees the new batch count
    BatchEnd,
    /// Before the first batch of an epoch; sees the epoch number about to run
    EpochStart,
    /// After the last batch of an epoch; sees the new epoch count
    EpochEnd,
}

impl Event {
    /// Every event, in firing order within one epoch.
    pub const ALL: [Event; 4] = [
        Event::EpochStart,
        Event::BatchStart,
        Event::BatchEnd,
        Event::EpochEnd,
    ];

    /// Name of the bag counter this event is gated on.
    pub fn counter(self) -> &'static str {
        match self {
            Event::BatchStart | Event::BatchEnd => BATCH,
            Event::EpochStart | Event::EpochEnd => EPOCH,
        }
    }

    /// Counter value this event would be fired with, given the bag as it is
    /// when the event fires.
    pub fn counter_value(self, params: &ParameterBag) -> u64 {
        match self {
            Event::BatchStart => params.batch() + 1,
            Event::BatchEnd => params.batch(),
            Event::EpochStart => params.epoch() + 1,
            Event::EpochEnd => params.epoch(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Event::BatchStart => "batch_start",
            Event::BatchEnd => "batch_end",
            Event::EpochStart => "epoch_start",
            Event::EpochEnd => "epoch_end",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        assert_eq!(Event::BatchStart.to_string(), "batch_start");
        assert_eq!(Event::EpochEnd.to_string(), "epoch_end");
    }

    #[test]
    fn test_event_counter() {
        assert_eq!(Event::BatchEnd.counter(), "batch");
        assert_eq!(Event::EpochStart.counter(), "epoch");
    }

    #[test]
    fn test_counter_value_start_events_look_ahead() {
        let mut params = ParameterBag::new();
        params.increment(BATCH);
        params.increment(BATCH);
        params.increment(EPOCH);

        assert_eq!(Event::BatchStart.counter_value(&params), 3);
        assert_eq!(Event::BatchEnd.counter_value(&params), 2);
        assert_eq!(Event::EpochStart.counter_value(&params), 2);
        assert_eq!(Event::EpochEnd.counter_value(&params), 1);
    }
}
