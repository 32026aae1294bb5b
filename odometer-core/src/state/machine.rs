//! Host machine states
//!
//! Mirrors the states a motion controller reports on its state-change
//! notification. Only the classification into active motion matters here.

/// Machine states reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineState {
    /// Ready, no motion
    Idle,
    /// Alarm lock; motion disabled
    Alarm,
    /// G-code check mode (no motion)
    CheckMode,
    /// Homing cycle in progress
    Homing,
    /// Executing a motion program
    Cycle,
    /// Feed hold
    Hold,
    /// Jogging
    Jog,
    /// Safety door opened; axes may still be decelerating
    SafetyDoor,
    /// Sleep mode
    Sleep,
    /// Waiting for a manual tool change
    ToolChange,
}

impl MachineState {
    /// Check if axes may be moving in this state
    ///
    /// Time spent in these states counts as motor run time.
    pub fn is_motion_active(&self) -> bool {
        matches!(
            self,
            MachineState::Cycle
                | MachineState::Jog
                | MachineState::Homing
                | MachineState::SafetyDoor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(MachineState::Cycle.is_motion_active());
        assert!(MachineState::Jog.is_motion_active());
        assert!(MachineState::Homing.is_motion_active());
        assert!(MachineState::SafetyDoor.is_motion_active());
    }

    #[test]
    fn test_inactive_states() {
        let states = [
            MachineState::Idle,
            MachineState::Alarm,
            MachineState::CheckMode,
            MachineState::Hold,
            MachineState::Sleep,
            MachineState::ToolChange,
        ];

        for state in states {
            assert!(!state.is_motion_active());
        }
    }
}
