//! Attaching to the host
//!
//! Interrupt-side entry points ([`EntryPoint`]) are wrapped by
//! [`CountingPulse`] and [`MeteredSpindle`]; foreground events arrive
//! through the [`EventHandler`] chain.

pub mod entry;
pub mod events;
pub mod interpose;

pub use entry::EntryPoint;
pub use events::EventHandler;
pub use interpose::{CountingPulse, Interposers, MeteredSpindle};
