//! Wrappers installed at the host's interrupt-side entry points
//!
//! Both wrappers keep the handler they replaced and always forward to it;
//! the odometer's bookkeeping never suppresses the hardware effect.
//!
//! The forwarding target is read on every interrupt and replaced from the
//! foreground when the wrapper is reinstalled. It is held behind a
//! critical-section mutex and copied out before forwarding, so the
//! underlying handler never runs inside the critical section.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use odometer_hal::Clock;

use super::entry::EntryPoint;
use crate::context::SharedState;
use crate::spindle::{SpindleId, SpindleMonitor, SpindleState};
use crate::steps::{AxisMask, StepCounter};
use crate::traits::{Hook, HookId, SpindleControl, StepPulse};

/// Handler a wrapper forwards to
type Next<'a, T> = Mutex<CriticalSectionRawMutex, Cell<Option<&'a T>>>;

/// Counts step pulses, then emits them through the wrapped generator
pub struct CountingPulse<'a, const N: usize> {
    counter: &'a StepCounter<N>,
    next: Next<'a, dyn StepPulse + 'a>,
}

impl<'a, const N: usize> CountingPulse<'a, N> {
    /// Create a wrapper counting into `counter`
    pub const fn new(counter: &'a StepCounter<N>) -> Self {
        Self {
            counter,
            next: Mutex::new(Cell::new(None)),
        }
    }

    /// Install in front of the handler at `entry`
    ///
    /// Returns `false` without changes if calls through `entry` already
    /// reach this wrapper.
    pub fn interpose(&'a self, entry: &EntryPoint<'a, dyn StepPulse + 'a>) -> bool {
        if entry.reaches(HookId::ODOMETER) {
            return false;
        }

        // Set the target before the entry point can reach this wrapper
        self.next.lock(|next| next.set(entry.handler()));
        let replaced = entry.install(self);
        self.next.lock(|next| next.set(replaced));
        debug!("Step pulse counter installed");
        true
    }
}

impl<const N: usize> Hook for CountingPulse<'_, N> {
    fn owner(&self) -> HookId {
        HookId::ODOMETER
    }

    fn forwards_to(&self, id: HookId) -> bool {
        id == HookId::ODOMETER || self.target().is_some_and(|next| next.forwards_to(id))
    }
}

impl<'a, const N: usize> CountingPulse<'a, N> {
    fn target(&self) -> Option<&'a (dyn StepPulse + 'a)> {
        self.next.lock(Cell::get)
    }
}

impl<const N: usize> StepPulse for CountingPulse<'_, N> {
    #[inline]
    fn pulse_start(&self, step_out: AxisMask) {
        self.counter.on_pulse(step_out);

        if let Some(next) = self.target() {
            next.pulse_start(step_out);
        }
    }
}

/// Applies spindle state changes, then meters the on-time
pub struct MeteredSpindle<'a, C: Clock> {
    monitor: &'a SpindleMonitor,
    clock: &'a C,
    next: Next<'a, dyn SpindleControl + 'a>,
}

impl<'a, C: Clock> MeteredSpindle<'a, C> {
    /// Create a wrapper metering into `monitor`
    pub const fn new(monitor: &'a SpindleMonitor, clock: &'a C) -> Self {
        Self {
            monitor,
            clock,
            next: Mutex::new(Cell::new(None)),
        }
    }

    /// Install in front of the spindle driver at `entry`
    ///
    /// Returns `false` without changes if calls through `entry` already
    /// reach this wrapper.
    pub fn interpose(&'a self, entry: &EntryPoint<'a, dyn SpindleControl + 'a>) -> bool {
        if entry.reaches(HookId::ODOMETER) {
            return false;
        }

        self.next.lock(|next| next.set(entry.handler()));
        let replaced = entry.install(self);
        self.next.lock(|next| next.set(replaced));
        debug!("Spindle meter installed");
        true
    }

    fn target(&self) -> Option<&'a (dyn SpindleControl + 'a)> {
        self.next.lock(Cell::get)
    }
}

impl<C: Clock> Hook for MeteredSpindle<'_, C> {
    fn owner(&self) -> HookId {
        HookId::ODOMETER
    }

    fn forwards_to(&self, id: HookId) -> bool {
        id == HookId::ODOMETER || self.target().is_some_and(|next| next.forwards_to(id))
    }
}

impl<C: Clock> SpindleControl for MeteredSpindle<'_, C> {
    fn id(&self) -> SpindleId {
        self.target()
            .map_or(SpindleId::PRIMARY, |next| next.id())
    }

    fn set_state(&self, state: SpindleState, rpm: f32) {
        if let Some(next) = self.target() {
            next.set_state(state, rpm);
        }

        self.monitor.on_set_state(state, self.clock.now_ms());
    }
}

/// The odometer's interrupt-side wrappers
///
/// Must outlive the host entry points it is installed into. The bundle is
/// `Sync`, so it can be a `static` next to the entry points.
pub struct Interposers<'a, const N: usize, C: Clock> {
    /// Step pulse counter
    pub pulse: CountingPulse<'a, N>,
    /// Primary spindle meter
    pub spindle: MeteredSpindle<'a, C>,
}

impl<'a, const N: usize, C: Clock> Interposers<'a, N, C> {
    /// Create wrappers feeding `shared`
    pub const fn new(shared: &'a SharedState<N>, clock: &'a C) -> Self {
        Self {
            pulse: CountingPulse::new(&shared.steps),
            spindle: MeteredSpindle::new(&shared.spindle, clock),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use portable_atomic::{AtomicU32, AtomicU8, Ordering};

    /// Step generator that counts the pulses it emits
    #[derive(Default)]
    pub struct FakeStepper {
        pulses: AtomicU32,
        last: AtomicU8,
    }

    impl FakeStepper {
        pub const fn new() -> Self {
            Self {
                pulses: AtomicU32::new(0),
                last: AtomicU8::new(0),
            }
        }

        pub fn pulses(&self) -> u32 {
            self.pulses.load(Ordering::Relaxed)
        }

        pub fn last(&self) -> AxisMask {
            AxisMask(self.last.load(Ordering::Relaxed))
        }
    }

    impl Hook for FakeStepper {}

    impl StepPulse for FakeStepper {
        fn pulse_start(&self, step_out: AxisMask) {
            self.pulses.fetch_add(1, Ordering::Relaxed);
            self.last.store(step_out.0, Ordering::Relaxed);
        }
    }

    /// Spindle driver that remembers the last applied state
    pub struct FakeSpindle {
        id: SpindleId,
        state: Mutex<CriticalSectionRawMutex, Cell<SpindleState>>,
        rpm: AtomicU32,
    }

    impl FakeSpindle {
        pub const fn new(id: u8) -> Self {
            Self {
                id: SpindleId(id),
                state: Mutex::new(Cell::new(SpindleState::OFF)),
                rpm: AtomicU32::new(0),
            }
        }

        pub fn state(&self) -> SpindleState {
            self.state.lock(Cell::get)
        }

        pub fn rpm(&self) -> f32 {
            f32::from_bits(self.rpm.load(Ordering::Relaxed))
        }
    }

    impl Hook for FakeSpindle {}

    impl SpindleControl for FakeSpindle {
        fn id(&self) -> SpindleId {
            self.id
        }

        fn set_state(&self, state: SpindleState, rpm: f32) {
            self.state.lock(|s| s.set(state));
            self.rpm.store(rpm.to_bits(), Ordering::Relaxed);
        }
    }

    /// Clock advanced by hand
    #[derive(Default)]
    pub struct ManualClock {
        now: AtomicU32,
    }

    impl ManualClock {
        pub const fn new() -> Self {
            Self {
                now: AtomicU32::new(0),
            }
        }

        pub fn set(&self, ms: u32) {
            self.now.store(ms, Ordering::Relaxed);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u32 {
            self.now.load(Ordering::Relaxed)
        }
    }
}
