//! Non-volatile storage abstractions
//!
//! Provides the trait for byte-addressable persistent storage that can be
//! implemented by board drivers for their EEPROM, FRAM or flash.

/// Storage technology behind an [`NvsStorage`] implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvsKind {
    /// No storage available
    None,
    /// Serial or parallel EEPROM
    Eeprom,
    /// Ferroelectric RAM
    Fram,
    /// Flash memory (sector erase required)
    Flash,
    /// EEPROM emulated in flash through a RAM buffer
    Emulated,
}

impl NvsKind {
    /// Check if single bytes can be rewritten in place
    ///
    /// Only these technologies tolerate a record being rewritten at every
    /// motion stop without a wear leveling layer.
    pub fn is_byte_rewritable(self) -> bool {
        matches!(self, NvsKind::Eeprom | NvsKind::Fram)
    }
}

/// Errors from non-volatile storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvsError {
    /// Integrity check (CRC or similar) failed on read
    Integrity,
    /// Bus or device error
    Io,
    /// Address range outside the device
    OutOfRange,
}

impl core::fmt::Display for NvsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NvsError::Integrity => f.write_str("integrity check failed"),
            NvsError::Io => f.write_str("storage I/O error"),
            NvsError::OutOfRange => f.write_str("address out of range"),
        }
    }
}

/// Byte-addressable non-volatile storage
///
/// Implementations add their own integrity protection to every block they
/// write and verify it on read. Callers treat the protection as opaque and
/// only reserve [`integrity_bytes`](NvsStorage::integrity_bytes) after each
/// block.
pub trait NvsStorage {
    /// Storage technology
    fn kind(&self) -> NvsKind;

    /// Total size of the device in bytes
    fn capacity(&self) -> u32;

    /// Bytes already claimed by the host (settings, driver area)
    ///
    /// The reserved area starts at address 0.
    fn reserved(&self) -> u32;

    /// Bytes of integrity data stored after each block
    fn integrity_bytes(&self) -> u32;

    /// Read `buffer.len()` bytes starting at `address`
    ///
    /// # Errors
    /// [`NvsError::Integrity`] if the stored check does not match the data.
    fn read(&mut self, address: u32, buffer: &mut [u8]) -> Result<(), NvsError>;

    /// Write `data` starting at `address`, followed by its integrity bytes
    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), NvsError>;
}

impl<T: NvsStorage + ?Sized> NvsStorage for &mut T {
    fn kind(&self) -> NvsKind {
        (**self).kind()
    }

    fn capacity(&self) -> u32 {
        (**self).capacity()
    }

    fn reserved(&self) -> u32 {
        (**self).reserved()
    }

    fn integrity_bytes(&self) -> u32 {
        (**self).integrity_bytes()
    }

    fn read(&mut self, address: u32, buffer: &mut [u8]) -> Result<(), NvsError> {
        (**self).read(address, buffer)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), NvsError> {
        (**self).write(address, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_rewritable_kinds() {
        assert!(NvsKind::Eeprom.is_byte_rewritable());
        assert!(NvsKind::Fram.is_byte_rewritable());
        assert!(!NvsKind::Flash.is_byte_rewritable());
        assert!(!NvsKind::Emulated.is_byte_rewritable());
        assert!(!NvsKind::None.is_byte_rewritable());
    }
}
