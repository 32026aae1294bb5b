//! Active-motion interval timing
//!
//! The motion epoch is armed on the inactive→active edge only. Consecutive
//! active notifications (`Cycle` → `SafetyDoor`, or a repeated `Cycle`)
//! keep the original epoch, so the full interval is counted once when the
//! machine leaves active motion.

use odometer_hal::time::elapsed_ms;

use super::machine::MachineState;
use crate::steps::StepCounter;

/// A finished active-motion interval, ready to be folded into the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSegment<const N: usize> {
    /// Time spent in active motion (0 if no epoch was armed)
    pub elapsed_ms: u32,
    /// Step pulses per axis during the interval
    pub steps: [u32; N],
}

/// Tracks the start of the current active-motion interval
#[derive(Debug, Clone, Default)]
pub struct MotionTracker {
    /// Tick at which the machine entered active motion
    epoch_ms: Option<u32>,
}

impl MotionTracker {
    /// Create a tracker with no interval in progress
    pub const fn new() -> Self {
        Self { epoch_ms: None }
    }

    /// Check if an active-motion interval is in progress
    pub fn is_armed(&self) -> bool {
        self.epoch_ms.is_some()
    }

    /// Process a state-change notification
    ///
    /// Returns a segment when the machine leaves active motion and step
    /// pulses were counted. Counters are consumed in that case. Leaving
    /// active motion without pulses discards the interval.
    pub fn observe<const N: usize>(
        &mut self,
        state: MachineState,
        now_ms: u32,
        counter: &StepCounter<N>,
    ) -> Option<MotionSegment<N>> {
        if state.is_motion_active() {
            if self.epoch_ms.is_none() {
                self.epoch_ms = Some(now_ms);
            }
            return None;
        }

        let epoch = self.epoch_ms.take();
        let steps = counter.take()?;

        Some(MotionSegment {
            elapsed_ms: epoch.map_or(0, |since| elapsed_ms(since, now_ms)),
            steps,
        })
    }
}
