//! Foreground odometer
//!
//! [`Odometer`] owns the current record and the slot store. It consumes the
//! counters in [`SharedState`] on state changes and deferred write requests,
//! and is the only writer of the record and of storage.
//!
//! [`Odometer::attach`] installs the step pulse counter and returns an
//! [`OdometerPlugin`] that joins the host's foreground event chain.

use core::fmt::Write;

use heapless::String;
use odometer_hal::{Clock, NvsStorage};

use crate::config::{AxisSettings, CAPABILITY_TAG, PLUGIN_NAME, PLUGIN_VERSION};
use crate::context::SharedState;
use crate::hooks::{EntryPoint, EventHandler, Interposers};
use crate::report::{MessageKind, Reporter, MAX_LINE_LEN};
use crate::spindle::SpindleId;
use crate::state::{MachineState, MotionTracker};
use crate::storage::{InitError, OdometerRecord, PersistError, RecordStore, Slot};
use crate::traits::{SpindleControl, StepPulse};

/// Accumulates and persists the odometer record
pub struct Odometer<'a, S: NvsStorage, C: Clock, const N: usize> {
    store: RecordStore<S>,
    clock: &'a C,
    shared: &'a SharedState<N>,
    settings: AxisSettings<N>,
    current: OdometerRecord<N>,
    tracker: MotionTracker,
}

impl<'a, S: NvsStorage, C: Clock, const N: usize> Odometer<'a, S, C, N> {
    /// Claim storage and load the current record
    ///
    /// A current record that cannot be loaded, for any reason, is replaced
    /// by a zeroed one which is persisted immediately.
    ///
    /// # Errors
    /// Returns [`InitError`] if `storage` is not EEPROM or FRAM, is too
    /// small, `N` exceeds [`MAX_AXES`](crate::config::MAX_AXES), or the
    /// zeroed record cannot be written. No hooks should be installed in
    /// that case; [`InitError::message`] is the warning for the user.
    pub fn new(
        storage: S,
        clock: &'a C,
        shared: &'a SharedState<N>,
        settings: AxisSettings<N>,
    ) -> Result<Self, InitError> {
        let store = match RecordStore::new::<N>(storage) {
            Ok(store) => store,
            Err(e) => {
                warn!("Odometers disabled: {}", e);
                return Err(e);
            }
        };

        let layout = store.layout();
        info!(
            "Odometer slots: current @{} previous @{} ({} bytes each)",
            layout.current,
            layout.previous,
            layout.slot_size
        );

        let mut odometer = Self {
            store,
            clock,
            shared,
            settings,
            current: OdometerRecord::zero(),
            tracker: MotionTracker::new(),
        };

        match odometer.store.load::<N>(Slot::Current) {
            Ok(record) => odometer.current = record,
            Err(e) => {
                warn!("Odometer record unavailable ({}), starting from zero", e);
                odometer.reset(false).map_err(InitError::Storage)?;
            }
        }

        Ok(odometer)
    }

    /// Current totals, including spindle time not yet folded in
    pub fn current(&self) -> OdometerRecord<N> {
        let mut record = self.current;
        record.add_spindle_ms(self.shared.spindle.pending_ms());
        record
    }

    /// Load the record stored in `slot`
    pub fn load(&mut self, slot: Slot) -> Result<OdometerRecord<N>, PersistError> {
        self.store.load(slot)
    }

    /// Axis scales used for distance conversion
    pub fn settings(&self) -> &AxisSettings<N> {
        &self.settings
    }

    /// Replace the axis scales
    ///
    /// Step pulses already counted are converted with the new scales.
    pub fn set_settings(&mut self, settings: AxisSettings<N>) {
        self.settings = settings;
    }

    /// Access the storage backend
    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    /// Mutable access to the storage backend
    pub fn storage_mut(&mut self) -> &mut S {
        self.store.storage_mut()
    }

    /// Slot addresses in use
    pub fn layout(&self) -> crate::storage::SlotLayout {
        self.store.layout()
    }

    /// Process a machine state change
    ///
    /// Leaving active motion with counted pulses folds motion time and
    /// distance into the record and persists it.
    pub fn on_state_change(&mut self, state: MachineState) {
        let now = self.clock.now_ms();

        if let Some(segment) = self.tracker.observe(state, now, &self.shared.steps) {
            self.current.apply_motion(&segment, &self.settings);
            debug!(
                "Motion segment folded: {} ms, {} axes",
                segment.elapsed_ms,
                N
            );
            let _ = self.flush();
        }
    }

    /// Persist the current record, folding in pending spindle time
    pub fn flush(&mut self) -> Result<(), PersistError> {
        self.fold_spindle();

        self.store.write(&self.current, Slot::Current).map_err(|e| {
            warn!("Odometer write failed: {}", e);
            e
        })
    }

    /// Serve a queued deferred write, if any
    ///
    /// Call from the foreground loop. Returns `true` if a write was
    /// attempted; any number of requests since the last call cost one write.
    pub fn poll_deferred(&mut self) -> bool {
        if !self.shared.spindle.take_write_request() {
            return false;
        }

        trace!("Serving deferred odometer write");
        let _ = self.flush();
        true
    }

    /// Wait for and serve deferred writes forever
    ///
    /// For hosts whose foreground runs an async executor.
    pub async fn run_deferred(&mut self) -> ! {
        loop {
            self.shared.spindle.write_request().await;
            let _ = self.flush();
        }
    }

    /// Zero the current record
    ///
    /// With `backup`, the current totals are first stored as the previous
    /// record. A failed backup write is logged and the reset proceeds.
    ///
    /// # Errors
    /// Returns the error from writing the zeroed current record. The
    /// in-memory record is zeroed regardless.
    pub fn reset(&mut self, backup: bool) -> Result<(), PersistError> {
        self.fold_spindle();

        if backup {
            if let Err(e) = self.store.write(&self.current, Slot::Previous) {
                warn!("Odometer backup failed: {}", e);
            }
        }

        self.current = OdometerRecord::zero();
        self.store.write(&self.current, Slot::Current).map_err(|e| {
            warn!("Odometer reset not saved: {}", e);
            e
        })?;

        info!("Odometers reset (backup: {})", backup);
        Ok(())
    }

    /// Install the step pulse counter and join the foreground event chain
    ///
    /// `next` is the handler that was registered before; every event is
    /// forwarded to it. `hooks` must feed the same [`SharedState`] this
    /// odometer consumes.
    pub fn attach<P: EventHandler<'a, N>>(
        self,
        pulse_entry: &'a EntryPoint<'a, dyn StepPulse + 'a>,
        hooks: &'a Interposers<'a, N, C>,
        next: P,
    ) -> OdometerPlugin<'a, S, C, P, N> {
        hooks.pulse.interpose(pulse_entry);

        OdometerPlugin {
            odometer: self,
            hooks,
            pulse_entry,
            next,
        }
    }

    fn fold_spindle(&mut self) {
        let pending = self.shared.spindle.take_pending_ms();
        if pending > 0 {
            trace!("Spindle on-time folded: {} ms", pending);
            self.current.add_spindle_ms(pending);
        }
    }
}

impl<S: NvsStorage, C: Clock, const N: usize> core::fmt::Debug for Odometer<'_, S, C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Odometer")
            .field("layout", &self.store.layout())
            .field("current", &self.current)
            .field("motion_armed", &self.tracker.is_armed())
            .finish()
    }
}

/// The odometer registered with the host
pub struct OdometerPlugin<'a, S: NvsStorage, C: Clock, P, const N: usize> {
    odometer: Odometer<'a, S, C, N>,
    hooks: &'a Interposers<'a, N, C>,
    pulse_entry: &'a EntryPoint<'a, dyn StepPulse + 'a>,
    next: P,
}

impl<'a, S: NvsStorage, C: Clock, P, const N: usize> OdometerPlugin<'a, S, C, P, N> {
    /// Access the odometer
    pub fn odometer(&self) -> &Odometer<'a, S, C, N> {
        &self.odometer
    }

    /// Mutable access to the odometer
    pub fn odometer_mut(&mut self) -> &mut Odometer<'a, S, C, N> {
        &mut self.odometer
    }

    /// Handler registered before the odometer
    pub fn next(&self) -> &P {
        &self.next
    }

    /// Serve a queued deferred write, if any
    pub fn poll_deferred(&mut self) -> bool {
        self.odometer.poll_deferred()
    }
}

impl<'a, S, C, P, const N: usize> EventHandler<'a, N> for OdometerPlugin<'a, S, C, P, N>
where
    S: NvsStorage,
    C: Clock,
    P: EventHandler<'a, N>,
{
    fn on_state_change(&mut self, state: MachineState) {
        self.odometer.on_state_change(state);
        self.next.on_state_change(state);
    }

    fn on_settings_changed(&mut self, settings: &AxisSettings<N>) {
        self.next.on_settings_changed(settings);

        self.odometer.set_settings(*settings);
        // A driver re-initialization may have replaced the counter
        self.hooks.pulse.interpose(self.pulse_entry);
    }

    fn on_spindle_selected(&mut self, spindle: &EntryPoint<'a, dyn SpindleControl + 'a>) {
        if spindle.spindle_id() == Some(SpindleId::PRIMARY) {
            self.hooks.spindle.interpose(spindle);
        }

        self.next.on_spindle_selected(spindle);
    }

    fn on_report_options(&mut self, newopt: bool, out: &mut dyn Reporter) {
        self.next.on_report_options(newopt, out);

        if newopt {
            out.write(",");
            out.write(CAPABILITY_TAG);
        } else {
            let mut line: String<MAX_LINE_LEN> = String::new();
            let _ = write!(line, "[PLUGIN:{} v{}]", PLUGIN_NAME, PLUGIN_VERSION);
            out.message(MessageKind::Plain, &line);
        }
    }
}
