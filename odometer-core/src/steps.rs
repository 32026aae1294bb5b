//! Step pulse counting
//!
//! [`StepCounter::on_pulse`] runs in the step interrupt: it touches only
//! atomics, never blocks and never fails. The foreground consumes the counts
//! with [`StepCounter::take`], an atomic snapshot-and-clear, so pulses that
//! race with the consume are carried into the next motion segment.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Set of axes that received a step pulse
///
/// Bit `i` corresponds to axis `i` (X = bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMask(pub u8);

impl AxisMask {
    /// No axis
    pub const NONE: Self = Self(0);
    /// X axis
    pub const X: Self = Self(1 << 0);
    /// Y axis
    pub const Y: Self = Self(1 << 1);
    /// Z axis
    pub const Z: Self = Self(1 << 2);
    /// A axis
    pub const A: Self = Self(1 << 3);
    /// B axis
    pub const B: Self = Self(1 << 4);
    /// C axis
    pub const C: Self = Self(1 << 5);

    /// Mask for a single axis index
    ///
    /// Indices beyond the mask width give an empty mask.
    pub const fn axis(index: usize) -> Self {
        if index < 8 {
            Self(1 << index)
        } else {
            Self::NONE
        }
    }

    /// Check if `index` is in the mask
    pub const fn contains(self, index: usize) -> bool {
        index < 8 && self.0 & (1 << index) != 0
    }

    /// Check if no axis is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl core::ops::BitOr for AxisMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

const ZERO: AtomicU32 = AtomicU32::new(0);

/// Per-axis step pulse counters with a dirty flag
#[derive(Debug)]
pub struct StepCounter<const N: usize> {
    steps: [AtomicU32; N],
    dirty: AtomicBool,
}

impl<const N: usize> Default for StepCounter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StepCounter<N> {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            steps: [ZERO; N],
            dirty: AtomicBool::new(false),
        }
    }

    /// Count one step pulse event
    ///
    /// Called from the step interrupt once per pulse event. Bits beyond `N`
    /// are ignored.
    #[inline]
    pub fn on_pulse(&self, step_out: AxisMask) {
        if step_out.is_empty() {
            return;
        }

        for (axis, count) in self.steps.iter().enumerate() {
            if step_out.contains(axis) {
                count.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.dirty.store(true, Ordering::Release);
    }

    /// Check if there are counts not yet consumed
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Pending count for one axis
    pub fn pending(&self, axis: usize) -> u32 {
        self.steps
            .get(axis)
            .map_or(0, |count| count.load(Ordering::Relaxed))
    }

    /// Snapshot and clear all counters
    ///
    /// Returns `None` if nothing was counted since the last take.
    pub fn take(&self) -> Option<[u32; N]> {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return None;
        }

        let mut out = [0u32; N];
        for (slot, count) in out.iter_mut().zip(self.steps.iter()) {
            *slot = count.swap(0, Ordering::Relaxed);
        }
        Some(out)
    }
}
