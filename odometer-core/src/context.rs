//! State shared with the interrupt side
//!
//! Everything the restricted-context wrappers write lives here, built from
//! atomics and an embassy-sync signal. The foreground owns the record; the
//! interrupt side never touches it.

use crate::spindle::SpindleMonitor;
use crate::steps::StepCounter;

/// Counters and flags written outside the foreground
///
/// Typically placed in a `static` and shared by reference with both the
/// [`Interposers`](crate::hooks::Interposers) and the
/// [`Odometer`](crate::Odometer).
#[derive(Debug, Default)]
pub struct SharedState<const N: usize> {
    /// Step pulses not yet folded into distance
    pub steps: StepCounter<N>,
    /// Primary spindle on-time and deferred write requests
    pub spindle: SpindleMonitor,
}

impl<const N: usize> SharedState<N> {
    /// Create zeroed state
    pub const fn new() -> Self {
        Self {
            steps: StepCounter::new(),
            spindle: SpindleMonitor::new(),
        }
    }
}
