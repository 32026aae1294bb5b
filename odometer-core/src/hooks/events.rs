//! Foreground event chain
//!
//! The host calls the most recently registered [`EventHandler`]. A plugin
//! registers by taking ownership of the previous handler and forwarding every
//! event to it, so registration order forms a chain ending in `()`.

use super::entry::EntryPoint;
use crate::config::AxisSettings;
use crate::report::Reporter;
use crate::state::MachineState;
use crate::traits::SpindleControl;

/// Foreground notifications from the host
///
/// All methods default to doing nothing.
pub trait EventHandler<'a, const N: usize> {
    /// The machine state changed
    fn on_state_change(&mut self, _state: MachineState) {}

    /// Settings were (re)loaded
    ///
    /// The host may have re-initialized its drivers, replacing handlers
    /// installed at its entry points.
    fn on_settings_changed(&mut self, _settings: &AxisSettings<N>) {}

    /// A spindle was selected and its entry point is about to be used
    fn on_spindle_selected(&mut self, _spindle: &EntryPoint<'a, dyn SpindleControl + 'a>) {}

    /// The host is reporting its options
    ///
    /// `newopt` selects the compact enumeration mode, where only capability
    /// tags are written.
    fn on_report_options(&mut self, _newopt: bool, _out: &mut dyn Reporter) {}
}

/// End of the chain
impl<const N: usize> EventHandler<'_, N> for () {}

impl<'a, const N: usize, T: EventHandler<'a, N> + ?Sized> EventHandler<'a, N> for &mut T {
    fn on_state_change(&mut self, state: MachineState) {
        (**self).on_state_change(state)
    }

    fn on_settings_changed(&mut self, settings: &AxisSettings<N>) {
        (**self).on_settings_changed(settings)
    }

    fn on_spindle_selected(&mut self, spindle: &EntryPoint<'a, dyn SpindleControl + 'a>) {
        (**self).on_spindle_selected(spindle)
    }

    fn on_report_options(&mut self, newopt: bool, out: &mut dyn Reporter) {
        (**self).on_report_options(newopt, out)
    }
}
