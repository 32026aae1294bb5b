//! Spindle driver trait

use super::Hook;
use crate::spindle::{SpindleId, SpindleState};

/// Controls a spindle
///
/// Depending on the driver, [`set_state`](SpindleControl::set_state) may be
/// called from an interrupt handler, so drivers must be `Sync`.
pub trait SpindleControl: Hook + Sync {
    /// Device identifier of this spindle
    fn id(&self) -> SpindleId;

    /// Apply a new state and speed
    fn set_state(&self, state: SpindleState, rpm: f32);
}
