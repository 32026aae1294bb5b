//! Machine state observation
//!
//! The host owns the machine state machine; the odometer only classifies
//! the states it is notified about and times the active-motion intervals.

pub mod machine;
pub mod tracker;

pub use machine::MachineState;
pub use tracker::{MotionSegment, MotionTracker};
