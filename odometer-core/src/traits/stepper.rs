//! Step pulse generator trait

use super::Hook;
use crate::steps::AxisMask;

/// Emits step pulses
///
/// Called from the step interrupt once per step event, so implementations
/// must finish in bounded time and must not block. Methods take `&self`;
/// drivers keep their registers behind interior mutability. The handler is
/// shared between the interrupt and the foreground, hence `Sync`.
pub trait StepPulse: Hook + Sync {
    /// Start a step pulse on every axis in `step_out`
    fn pulse_start(&self, step_out: AxisMask);
}
