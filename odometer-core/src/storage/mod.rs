//! Record persistence
//!
//! Fixed-width record encoding and the current/previous slot manager on top
//! of an [`odometer_hal::NvsStorage`] backend.

pub mod record;
pub mod slots;

pub use record::{OdometerRecord, RecordError, MAX_RECORD_SIZE};
pub use slots::{InitError, PersistError, RecordStore, Slot, SlotLayout};
