//! Run result types

use std::fmt;

/// Why `run()` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `quit()` returned true
    Quit,
    /// The data source has nothing left
    Exhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Quit => f.write_str("quit"),
            StopReason::Exhausted => f.write_str("data exhausted"),
        }
    }
}

/// Result of one `run()` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Batches trained during this call
    pub batches: u64,
    /// Items processed during this call
    pub items: u64,
    /// Why the loop ended
    pub stop_reason: StopReason,
    /// Batch counter after the call
    pub batch: u64,
    /// Epoch counter after the call
    pub epoch: u64,
}
