//! Host capability traits
//!
//! These traits abstract over the host controller's step pulse generator
//! and spindle drivers, the two entry points that run outside the
//! foreground and that the odometer wraps.

pub mod spindle;
pub mod stepper;

pub use spindle::SpindleControl;
pub use stepper::StepPulse;

/// Identifies who installed a handler at a host entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HookId(pub &'static str);

impl HookId {
    /// Handlers provided by the host itself (drivers)
    pub const HOST: Self = Self("host");
    /// Wrappers installed by the odometer
    pub const ODOMETER: Self = Self("odometer");
}

/// Ownership information every installable handler provides
pub trait Hook {
    /// Owner of this handler
    fn owner(&self) -> HookId {
        HookId::HOST
    }

    /// Check if `id`'s handler is this one or is reached by forwarding
    ///
    /// Wrappers override this to also ask the handler they forward to, so a
    /// plugin can tell whether it is still somewhere in the chain.
    fn forwards_to(&self, id: HookId) -> bool {
        self.owner() == id
    }
}
