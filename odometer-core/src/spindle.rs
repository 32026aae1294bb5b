//! Spindle run time metering
//!
//! [`SpindleMonitor::on_set_state`] may run inside the spindle driver's
//! interrupt handler, so it never touches storage or the odometer record.
//! Finished on-intervals are added to an atomic pending total and a
//! payload-less signal asks the foreground to fold and persist them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use odometer_hal::time::elapsed_ms;
use portable_atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

/// Identifier of a spindle device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpindleId(pub u8);

impl SpindleId {
    /// The primary spindle, the only one metered
    pub const PRIMARY: Self = Self(0);
}

/// Requested spindle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpindleState {
    /// Spindle energized
    pub on: bool,
    /// Counter-clockwise rotation
    pub ccw: bool,
}

impl SpindleState {
    /// Spindle off
    pub const OFF: Self = Self { on: false, ccw: false };

    /// Spindle on, clockwise
    pub const CW: Self = Self { on: true, ccw: false };

    /// Spindle on, counter-clockwise
    pub const CCW: Self = Self { on: true, ccw: true };
}

/// Meters spindle-on time for the primary spindle
#[derive(Default)]
pub struct SpindleMonitor {
    /// An on-interval is in progress
    running: AtomicBool,
    /// Tick at which the current on-interval started
    epoch_ms: AtomicU32,
    /// Finished on-time not yet folded into the record
    pending_ms: AtomicU64,
    /// Request for a foreground write of the current record
    deferred: Signal<CriticalSectionRawMutex, ()>,
}

impl core::fmt::Debug for SpindleMonitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpindleMonitor")
            .field("running", &self.is_running())
            .field("pending_ms", &self.pending_ms())
            .field("write_requested", &self.write_requested())
            .finish()
    }
}

impl SpindleMonitor {
    /// Create an idle monitor
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            epoch_ms: AtomicU32::new(0),
            pending_ms: AtomicU64::new(0),
            deferred: Signal::new(),
        }
    }

    /// Observe a spindle state change that has already been applied
    ///
    /// An "on" request arms the interval unless one is already running, so
    /// speed changes while on do not restart it. An "off" request closes a
    /// running interval and requests a deferred write.
    pub fn on_set_state(&self, state: SpindleState, now_ms: u32) {
        if state.on {
            if !self.running.load(Ordering::Acquire) {
                self.epoch_ms.store(now_ms, Ordering::Relaxed);
                self.running.store(true, Ordering::Release);
            }
        } else if self.running.swap(false, Ordering::AcqRel) {
            let since = self.epoch_ms.load(Ordering::Relaxed);
            let interval = elapsed_ms(since, now_ms);
            self.pending_ms.fetch_add(interval as u64, Ordering::AcqRel);
            self.deferred.signal(());
        }
    }

    /// Check if the spindle is metered as running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Finished on-time not yet folded into the record
    pub fn pending_ms(&self) -> u64 {
        self.pending_ms.load(Ordering::Acquire)
    }

    /// Take the finished on-time not yet folded into the record
    pub fn take_pending_ms(&self) -> u64 {
        self.pending_ms.swap(0, Ordering::AcqRel)
    }

    /// Check if a deferred write is queued
    pub fn write_requested(&self) -> bool {
        self.deferred.signaled()
    }

    /// Dequeue a deferred write request
    ///
    /// Any number of requests made since the last call collapse into one.
    pub fn take_write_request(&self) -> bool {
        self.deferred.try_take().is_some()
    }

    /// Wait until a deferred write is requested
    ///
    /// For hosts whose foreground runs an async executor.
    pub async fn write_request(&self) {
        self.deferred.wait().await
    }
}
