//! Current/previous record slots
//!
//! Two fixed slots sit at the top of the NVS address space, current first
//! (highest) then previous, each `record size + integrity bytes` long:
//!
//! ```text
//! 0                                                        capacity
//! ├── host reserved ──┤ ... free ... ├── previous ──┤── current ──┤
//! ```

use odometer_hal::{NvsError, NvsStorage};

use super::record::{OdometerRecord, RecordError, MAX_RECORD_SIZE};
use crate::config::MAX_AXES;

/// Which of the two records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Live totals
    Current,
    /// Snapshot taken by the last reset with backup
    Previous,
}

/// Reasons the odometer cannot run on a storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Storage cannot rewrite single bytes (flash, emulated EEPROM, none)
    UnsupportedStorage,
    /// Not enough free space above the host's reserved area
    InsufficientCapacity {
        /// Bytes needed for both slots
        required: u32,
        /// Bytes free above the reserved area
        available: u32,
    },
    /// Axis count beyond what a record can hold
    TooManyAxes {
        /// Configured axes
        axes: usize,
        /// Supported axes
        max: usize,
    },
    /// The initial record could not be written
    Storage(PersistError),
}

impl InitError {
    /// One-line warning for the user at startup
    pub fn message(&self) -> &'static str {
        match self {
            InitError::UnsupportedStorage => "EEPROM or FRAM is required for odometers!",
            InitError::InsufficientCapacity { .. } => "Not enough NVS storage for odometers!",
            InitError::TooManyAxes { .. } => "Too many axes for odometers!",
            InitError::Storage(_) => "Odometer storage write failed!",
        }
    }
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InitError::Storage(e) => write!(f, "{} ({})", self.message(), e),
            _ => f.write_str(self.message()),
        }
    }
}

/// Errors loading or storing a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Backend integrity check failed
    Integrity,
    /// Backend I/O failure
    Backend(NvsError),
    /// Stored bytes passed the integrity check but are not a valid record
    Format(RecordError),
}

impl From<NvsError> for PersistError {
    fn from(e: NvsError) -> Self {
        match e {
            NvsError::Integrity => PersistError::Integrity,
            other => PersistError::Backend(other),
        }
    }
}

impl From<RecordError> for PersistError {
    fn from(e: RecordError) -> Self {
        PersistError::Format(e)
    }
}

impl core::fmt::Display for PersistError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PersistError::Integrity => f.write_str("stored record failed integrity check"),
            PersistError::Backend(e) => write!(f, "storage backend error: {}", e),
            PersistError::Format(_) => f.write_str("stored record is malformed"),
        }
    }
}

/// Addresses of the two slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotLayout {
    /// Address of the current record
    pub current: u32,
    /// Address of the previous record
    pub previous: u32,
    /// Bytes per slot, integrity included
    pub slot_size: u32,
}

impl SlotLayout {
    /// Place both slots at the top of `storage`
    ///
    /// # Errors
    /// The backend must rewrite single bytes and have room for two slots
    /// above its reserved area.
    pub fn plan<S: NvsStorage + ?Sized>(storage: &S, record_size: usize) -> Result<Self, InitError> {
        if !storage.kind().is_byte_rewritable() {
            return Err(InitError::UnsupportedStorage);
        }

        let slot_size = record_size as u32 + storage.integrity_bytes();
        let required = slot_size * 2;
        let available = storage.capacity().saturating_sub(storage.reserved());
        if available < required {
            return Err(InitError::InsufficientCapacity { required, available });
        }

        let current = storage.capacity() - slot_size;
        Ok(Self {
            current,
            previous: current - slot_size,
            slot_size,
        })
    }

    /// Address of `slot`
    pub fn address(&self, slot: Slot) -> u32 {
        match slot {
            Slot::Current => self.current,
            Slot::Previous => self.previous,
        }
    }
}

/// Reads and writes odometer records in their slots
#[derive(Debug)]
pub struct RecordStore<S: NvsStorage> {
    storage: S,
    layout: SlotLayout,
}

impl<S: NvsStorage> RecordStore<S> {
    /// Claim the two slots on `storage`
    ///
    /// Records hold at most [`MAX_AXES`] axes.
    pub fn new<const N: usize>(storage: S) -> Result<Self, InitError> {
        if N > MAX_AXES {
            return Err(InitError::TooManyAxes {
                axes: N,
                max: MAX_AXES,
            });
        }

        let layout = SlotLayout::plan(&storage, OdometerRecord::<N>::SIZE)?;
        Ok(Self { storage, layout })
    }

    /// Slot addresses
    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    /// Access the backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the backend
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Load the record stored in `slot`
    pub fn load<const N: usize>(&mut self, slot: Slot) -> Result<OdometerRecord<N>, PersistError> {
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let bytes = buffer
            .get_mut(..OdometerRecord::<N>::SIZE)
            .ok_or(PersistError::Format(RecordError::Length))?;

        self.storage.read(self.layout.address(slot), bytes)?;
        Ok(OdometerRecord::decode(bytes)?)
    }

    /// Store `record` in `slot`
    ///
    /// The encoding is deterministic, so storing the same record twice
    /// leaves the same bytes behind.
    pub fn write<const N: usize>(
        &mut self,
        record: &OdometerRecord<N>,
        slot: Slot,
    ) -> Result<(), PersistError> {
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let bytes = record.encode(&mut buffer)?;

        self.storage.write(self.layout.address(slot), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odometer_hal::{NvsKind, RamNvs};

    fn sample() -> OdometerRecord<3> {
        OdometerRecord {
            motor_ms: 7_200_000,
            spindle_ms: 3_660_000,
            distance: [1234.5, 0.25, 88.0],
        }
    }

    #[test]
    fn test_layout_at_top() {
        let nvs = RamNvs::<256>::eeprom(128);
        let layout = SlotLayout::plan(&nvs, 28).unwrap();

        assert_eq!(layout.slot_size, 30);
        assert_eq!(layout.current, 226);
        assert_eq!(layout.previous, 196);
        assert_eq!(layout.address(Slot::Previous), 196);
    }

    #[test]
    fn test_layout_exact_fit() {
        // 256 - 196 = 60 = 2 * 30
        let nvs = RamNvs::<256>::eeprom(196);
        assert!(SlotLayout::plan(&nvs, 28).is_ok());

        let nvs = RamNvs::<256>::eeprom(197);
        assert_eq!(
            SlotLayout::plan(&nvs, 28),
            Err(InitError::InsufficientCapacity {
                required: 60,
                available: 59,
            })
        );
    }

    #[test]
    fn test_layout_rejects_flash() {
        let nvs = RamNvs::<256>::new(NvsKind::Flash, 0);
        assert_eq!(
            SlotLayout::plan(&nvs, 28),
            Err(InitError::UnsupportedStorage)
        );

        let nvs = RamNvs::<256>::new(NvsKind::Emulated, 0);
        assert_eq!(
            SlotLayout::plan(&nvs, 28),
            Err(InitError::UnsupportedStorage)
        );
    }

    #[test]
    fn test_reserved_larger_than_capacity() {
        let nvs = RamNvs::<64>::eeprom(1024);
        assert!(matches!(
            SlotLayout::plan(&nvs, 28),
            Err(InitError::InsufficientCapacity { available: 0, .. })
        ));
    }

    #[test]
    fn test_too_many_axes() {
        let result = RecordStore::new::<7>(RamNvs::<512>::eeprom(0));
        assert_eq!(
            result.err(),
            Some(InitError::TooManyAxes { axes: 7, max: 6 })
        );

        assert!(RecordStore::new::<6>(RamNvs::<512>::eeprom(0)).is_ok());
    }

    #[test]
    fn test_write_load_roundtrip() {
        let mut store = RecordStore::new::<3>(RamNvs::<256>::eeprom(0)).unwrap();
        store.write(&sample(), Slot::Current).unwrap();

        assert_eq!(store.load::<3>(Slot::Current), Ok(sample()));
        // Previous untouched
        assert_eq!(store.load::<3>(Slot::Previous), Err(PersistError::Integrity));
    }

    #[test]
    fn test_write_is_idempotent() {
        let mut store = RecordStore::new::<3>(RamNvs::<256>::eeprom(0)).unwrap();
        store.write(&sample(), Slot::Current).unwrap();
        let first: [u8; 256] = store.storage().raw().try_into().unwrap();

        store.write(&sample(), Slot::Current).unwrap();
        assert_eq!(store.storage().raw(), &first[..]);
        assert_eq!(store.storage().write_count(), 2);
    }

    #[test]
    fn test_corrupt_slot() {
        let mut store = RecordStore::new::<3>(RamNvs::<256>::eeprom(0)).unwrap();
        store.write(&sample(), Slot::Current).unwrap();
        let address = store.layout().current;
        store.storage_mut().corrupt(address + 4);

        assert_eq!(store.load::<3>(Slot::Current), Err(PersistError::Integrity));
    }

    #[test]
    fn test_backend_failure() {
        let mut store = RecordStore::new::<3>(RamNvs::<256>::eeprom(0)).unwrap();
        store.storage_mut().set_fail_writes(true);

        assert_eq!(
            store.write(&sample(), Slot::Current),
            Err(PersistError::Backend(NvsError::Io))
        );
    }
}
