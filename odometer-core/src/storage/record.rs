//! Odometer record and its persisted layout
//!
//! The record is stored with an explicit little-endian, fixed-width layout
//! with no padding, independent of the in-memory representation:
//!
//! ```text
//! ┌──────────┬────────────┬──────────────┬─────┬──────────────┐
//! │ motor_ms │ spindle_ms │ distance[0]  │ ... │ distance[N-1]│
//! │ u64 LE   │ u64 LE     │ f32 LE       │     │ f32 LE       │
//! └──────────┴────────────┴──────────────┴─────┴──────────────┘
//! ```

use crate::config::{AxisSettings, MAX_AXES};
use crate::state::MotionSegment;

/// Bytes of the two run time fields
const TIMES_SIZE: usize = 16;

/// Largest encoded record, for fixed stack buffers
pub const MAX_RECORD_SIZE: usize = TIMES_SIZE + 4 * MAX_AXES;

/// Errors decoding a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Buffer length does not match the record size
    Length,
    /// A distance is negative or not a finite number
    InvalidDistance,
}

/// Cumulative run time and travel totals
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OdometerRecord<const N: usize> {
    /// Milliseconds spent in active motion
    pub motor_ms: u64,
    /// Milliseconds the primary spindle was on
    pub spindle_ms: u64,
    /// Travel per axis in millimeters (axis scale units)
    pub distance: [f32; N],
}

impl<const N: usize> Default for OdometerRecord<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> OdometerRecord<N> {
    /// Encoded size in bytes
    pub const SIZE: usize = TIMES_SIZE + 4 * N;

    /// The all-zero record
    pub const fn zero() -> Self {
        Self {
            motor_ms: 0,
            spindle_ms: 0,
            distance: [0.0; N],
        }
    }

    /// Fold a finished motion segment into the totals
    ///
    /// Axes without a usable scale keep their distance; their steps are
    /// dropped.
    pub fn apply_motion(&mut self, segment: &MotionSegment<N>, settings: &AxisSettings<N>) {
        self.motor_ms = self.motor_ms.saturating_add(segment.elapsed_ms as u64);

        for (axis, &steps) in segment.steps.iter().enumerate() {
            if steps == 0 {
                continue;
            }
            match settings.scale(axis) {
                Some(scale) => self.distance[axis] += steps as f32 / scale,
                None => warn!("Axis {} has no valid scale, {} steps dropped", axis, steps),
            }
        }
    }

    /// Add spindle on-time
    pub fn add_spindle_ms(&mut self, ms: u64) {
        self.spindle_ms = self.spindle_ms.saturating_add(ms);
    }

    /// Encode into `buffer`, returning the encoded bytes
    ///
    /// # Errors
    /// [`RecordError::Length`] if the buffer is shorter than [`Self::SIZE`].
    pub fn encode<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b [u8], RecordError> {
        let out = buffer.get_mut(..Self::SIZE).ok_or(RecordError::Length)?;

        out[0..8].copy_from_slice(&self.motor_ms.to_le_bytes());
        out[8..16].copy_from_slice(&self.spindle_ms.to_le_bytes());
        for (chunk, distance) in out[TIMES_SIZE..].chunks_exact_mut(4).zip(self.distance.iter()) {
            chunk.copy_from_slice(&distance.to_le_bytes());
        }

        Ok(out)
    }

    /// Decode a record of exactly [`Self::SIZE`] bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() != Self::SIZE {
            return Err(RecordError::Length);
        }

        let mut record = Self::zero();
        record.motor_ms = u64::from_le_bytes(le_array(&bytes[0..8]));
        record.spindle_ms = u64::from_le_bytes(le_array(&bytes[8..16]));

        for (distance, chunk) in record.distance.iter_mut().zip(bytes[TIMES_SIZE..].chunks_exact(4)) {
            let value = f32::from_le_bytes(le_array(chunk));
            if !value.is_finite() || value < 0.0 {
                return Err(RecordError::InvalidDistance);
            }
            *distance = value;
        }

        Ok(record)
    }
}

/// Copy a slice whose length the caller has already fixed into an array
fn le_array<const W: usize>(bytes: &[u8]) -> [u8; W] {
    let mut out = [0u8; W];
    out.copy_from_slice(bytes);
    out
}
