//! RAM-backed byte-addressable storage
//!
//! Behaves like a small EEPROM: every block written is followed by a
//! CRC-16/CCITT-FALSE checksum that is verified on read. Used for host
//! simulation and tests; boards provide their own [`NvsStorage`] drivers.

use crate::nvs::{NvsError, NvsKind, NvsStorage};

/// Integrity bytes appended to every block
pub const RAM_NVS_CRC_BYTES: u32 = 2;

/// Erased cell value
const ERASED: u8 = 0xFF;

/// RAM-backed [`NvsStorage`] of `SIZE` bytes
#[derive(Debug, Clone)]
pub struct RamNvs<const SIZE: usize> {
    data: [u8; SIZE],
    kind: NvsKind,
    reserved: u32,
    /// Number of successful writes
    writes: u32,
    /// Fail every write with [`NvsError::Io`]
    fail_writes: bool,
}

impl<const SIZE: usize> RamNvs<SIZE> {
    /// Create an erased store of the given technology
    pub const fn new(kind: NvsKind, reserved: u32) -> Self {
        Self {
            data: [ERASED; SIZE],
            kind,
            reserved,
            writes: 0,
            fail_writes: false,
        }
    }

    /// Create an erased EEPROM with `reserved` bytes claimed by the host
    pub const fn eeprom(reserved: u32) -> Self {
        Self::new(NvsKind::Eeprom, reserved)
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw cell contents, including checksums
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Flip every bit of the byte at `address`
    ///
    /// Lets tests simulate a corrupted cell.
    pub fn corrupt(&mut self, address: u32) {
        if let Some(byte) = self.data.get_mut(address as usize) {
            *byte ^= 0xFF;
        }
    }

    fn range(&self, address: u32, len: usize) -> Result<core::ops::Range<usize>, NvsError> {
        let start = address as usize;
        let end = start
            .checked_add(len)
            .and_then(|end| end.checked_add(RAM_NVS_CRC_BYTES as usize))
            .ok_or(NvsError::OutOfRange)?;
        if end > SIZE {
            return Err(NvsError::OutOfRange);
        }
        Ok(start..start + len)
    }
}

impl<const SIZE: usize> NvsStorage for RamNvs<SIZE> {
    fn kind(&self) -> NvsKind {
        self.kind
    }

    fn capacity(&self) -> u32 {
        SIZE as u32
    }

    fn reserved(&self) -> u32 {
        self.reserved
    }

    fn integrity_bytes(&self) -> u32 {
        RAM_NVS_CRC_BYTES
    }

    fn read(&mut self, address: u32, buffer: &mut [u8]) -> Result<(), NvsError> {
        let range = self.range(address, buffer.len())?;
        let end = range.end;
        buffer.copy_from_slice(&self.data[range]);

        let stored = u16::from_le_bytes([self.data[end], self.data[end + 1]]);
        if stored != crc16(buffer) {
            return Err(NvsError::Integrity);
        }
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), NvsError> {
        if self.fail_writes {
            return Err(NvsError::Io);
        }
        let range = self.range(address, data.len())?;
        let end = range.end;
        self.data[range].copy_from_slice(data);
        self.data[end..end + 2].copy_from_slice(&crc16(data).to_le_bytes());
        self.writes = self.writes.wrapping_add(1);
        Ok(())
    }
}

/// CRC-16/CCITT-FALSE (polynomial 0x1021, initial value 0xFFFF)
fn crc16(data: &[u8]) -> u16 {
    const POLY: u16 = 0x1021;
    let mut crc: u16 = 0xFFFF;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}
