//! Configuration types
//!
//! Axis settings supplied by the host and the plugin's identity constants.

pub mod axes;
pub mod plugin;

pub use axes::*;
pub use plugin::*;
