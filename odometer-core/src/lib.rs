//! Board-agnostic odometer engine for motion-control machines
//!
//! Keeps cumulative machine statistics that survive power loss:
//!
//! - Time the axes spent in active motion
//! - Time the primary spindle was on
//! - Distance traveled per axis, derived from step pulse counts
//!
//! Step pulses and spindle state changes are observed by wrappers installed
//! at the host's interrupt-side entry points ([`hooks`]). They only touch
//! atomics in [`SharedState`]. The foreground [`Odometer`] folds those into
//! the record on machine state changes and deferred write requests, and
//! persists it to the current slot of an [`odometer_hal::NvsStorage`]
//! backend. A reset can first copy the totals into the previous slot.
//!
//! The `ODOMETERS` command ([`command`]) reports and resets the totals.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

pub mod command;
pub mod config;
pub mod context;
pub mod hooks;
pub mod odometer;
pub mod report;
pub mod spindle;
pub mod state;
pub mod steps;
pub mod storage;
pub mod traits;

pub use command::{CommandStatus, SysCommand};
pub use config::AxisSettings;
pub use context::SharedState;
pub use odometer::{Odometer, OdometerPlugin};
pub use storage::{InitError, OdometerRecord, PersistError, Slot};
