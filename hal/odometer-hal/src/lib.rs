//! Odometer Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the odometer core
//! needs from a board: byte-addressable non-volatile storage and a
//! monotonic millisecond clock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Host controller firmware               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  odometer-core (accumulation engine)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  odometer-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ board EEPROM/ │       │    RamNvs     │
//! │ FRAM driver   │       │ (host, tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`nvs::NvsStorage`] - Byte-addressable persistent storage
//! - [`time::Clock`] - Millisecond tick source

#![no_std]
#![deny(unsafe_code)]

pub mod nvs;
pub mod ram;
pub mod time;

// Re-export key traits at crate root for convenience
pub use nvs::{NvsError, NvsKind, NvsStorage};
pub use ram::RamNvs;
pub use time::Clock;
