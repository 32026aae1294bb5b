//! The `ODOMETERS` system command
//!
//! ```text
//! $ODOMETERS        report the current totals
//! $ODOMETERS=PREV   report the totals saved by the last reset
//! $ODOMETERS=RST    save the current totals as previous and zero them
//! ```

use odometer_hal::{Clock, NvsStorage};

use crate::config::{COMMAND_HELP, COMMAND_NAME};
use crate::odometer::{Odometer, OdometerPlugin};
use crate::report::{report_record, MessageKind, Reporter};
use crate::storage::Slot;

/// Warning shown when `PREV` finds no usable previous record
pub const PREV_UNAVAILABLE: &str = "Previous odometer values not available";

/// Warning shown when `RST` could not persist the zeroed record
pub const RESET_NOT_SAVED: &str = "Odometer reset could not be saved";

/// Outcome of a system command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandStatus {
    /// Command executed
    Ok,
    /// Command executed, with a warning shown to the user
    Warning,
    /// Arguments not recognized; the host may try other handlers
    Unhandled,
}

impl CommandStatus {
    /// Check if the command was executed
    pub fn is_ok(self) -> bool {
        matches!(self, CommandStatus::Ok | CommandStatus::Warning)
    }
}

/// A command the host dispatches by name
pub trait SysCommand {
    /// Command name without the host's prefix
    fn name(&self) -> &'static str;

    /// Help text for the host's command listing
    fn help(&self) -> &'static str;

    /// Execute with the text after `=`, or `None` if there was none
    fn execute(&mut self, args: Option<&str>, out: &mut dyn Reporter) -> CommandStatus;
}

/// Forms of the `ODOMETERS` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OdometerCommand {
    /// Report the current record
    Report,
    /// Report the previous record
    Previous,
    /// Back up and zero the current record
    Reset,
}

impl OdometerCommand {
    /// Parse command arguments, ignoring ASCII case
    ///
    /// Returns `None` for unrecognized arguments.
    pub fn parse(args: Option<&str>) -> Option<Self> {
        match args {
            None => Some(OdometerCommand::Report),
            Some(arg) if arg.eq_ignore_ascii_case("PREV") => Some(OdometerCommand::Previous),
            Some(arg) if arg.eq_ignore_ascii_case("RST") => Some(OdometerCommand::Reset),
            Some(_) => None,
        }
    }
}

impl<S: NvsStorage, C: Clock, const N: usize> SysCommand for Odometer<'_, S, C, N> {
    fn name(&self) -> &'static str {
        COMMAND_NAME
    }

    fn help(&self) -> &'static str {
        COMMAND_HELP
    }

    fn execute(&mut self, args: Option<&str>, out: &mut dyn Reporter) -> CommandStatus {
        let Some(command) = OdometerCommand::parse(args) else {
            return CommandStatus::Unhandled;
        };

        match command {
            OdometerCommand::Report => {
                report_record(&self.current(), out);
                CommandStatus::Ok
            }
            OdometerCommand::Previous => match self.load(Slot::Previous) {
                Ok(previous) => {
                    report_record(&previous, out);
                    CommandStatus::Ok
                }
                Err(e) => {
                    debug!("Previous odometer record unavailable: {}", e);
                    out.message(MessageKind::Warning, PREV_UNAVAILABLE);
                    CommandStatus::Warning
                }
            },
            OdometerCommand::Reset => match self.reset(true) {
                Ok(()) => CommandStatus::Ok,
                Err(_) => {
                    out.message(MessageKind::Warning, RESET_NOT_SAVED);
                    CommandStatus::Warning
                }
            },
        }
    }
}

impl<S: NvsStorage, C: Clock, P, const N: usize> SysCommand for OdometerPlugin<'_, S, C, P, N> {
    fn name(&self) -> &'static str {
        self.odometer().name()
    }

    fn help(&self) -> &'static str {
        self.odometer().help()
    }

    fn execute(&mut self, args: Option<&str>, out: &mut dyn Reporter) -> CommandStatus {
        self.odometer_mut().execute(args, out)
    }
}
