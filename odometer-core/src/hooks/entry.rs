//! Host entry points
//!
//! An [`EntryPoint`] is the slot through which the host calls a handler.
//! Installing a handler returns the one it replaces so the new handler can
//! forward to it.
//!
//! The slot is read by interrupt handlers and replaced from the foreground,
//! so it sits behind a critical-section mutex and an entry point can be a
//! `static`.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::spindle::{SpindleId, SpindleState};
use crate::steps::AxisMask;
use crate::traits::{Hook, HookId, SpindleControl, StepPulse};

/// A replaceable host entry point
pub struct EntryPoint<'a, T: ?Sized + 'a> {
    handler: Mutex<CriticalSectionRawMutex, Cell<Option<&'a T>>>,
}

impl<'a, T: ?Sized + Hook + 'a> EntryPoint<'a, T> {
    /// Create an entry point served by `handler`
    pub const fn new(handler: &'a T) -> Self {
        Self {
            handler: Mutex::new(Cell::new(Some(handler))),
        }
    }

    /// Create an entry point with no handler
    pub const fn empty() -> Self {
        Self {
            handler: Mutex::new(Cell::new(None)),
        }
    }

    /// Currently installed handler
    pub fn handler(&self) -> Option<&'a T> {
        self.handler.lock(Cell::get)
    }

    /// Owner of the currently installed handler
    pub fn owner(&self) -> Option<HookId> {
        self.handler().map(|h| h.owner())
    }

    /// Check if calls through this entry point reach `id`'s handler
    pub fn reaches(&self, id: HookId) -> bool {
        self.handler().is_some_and(|h| h.forwards_to(id))
    }

    /// Install `handler`, returning the one it replaces
    pub fn install(&self, handler: &'a T) -> Option<&'a T> {
        self.handler.lock(|slot| slot.replace(Some(handler)))
    }
}

impl<'a> EntryPoint<'a, dyn StepPulse + 'a> {
    /// Emit a step pulse through the installed handler
    pub fn pulse_start(&self, step_out: AxisMask) {
        if let Some(handler) = self.handler() {
            handler.pulse_start(step_out);
        }
    }
}

impl<'a> EntryPoint<'a, dyn SpindleControl + 'a> {
    /// Device identifier of the installed spindle
    pub fn spindle_id(&self) -> Option<SpindleId> {
        self.handler().map(|h| h.id())
    }

    /// Set the spindle state through the installed handler
    pub fn set_state(&self, state: SpindleState, rpm: f32) {
        if let Some(handler) = self.handler() {
            handler.set_state(state, rpm);
        }
    }
}

impl<'a, T: ?Sized + Hook + 'a> core::fmt::Debug for EntryPoint<'a, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntryPoint")
            .field("owner", &self.owner())
            .finish()
    }
}
