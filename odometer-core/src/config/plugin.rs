//! Plugin identity
//!
//! Strings the host prints when it enumerates plugins and options, and the
//! command the odometer registers.

/// Plugin name in the identification line
pub const PLUGIN_NAME: &str = "Odometers";

/// Plugin version in the identification line
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Capability tag appended to the options report
pub const CAPABILITY_TAG: &str = "ODO";

/// Command name (without the host's `$` prefix)
pub const COMMAND_NAME: &str = "ODOMETERS";

/// Command help, one line per form
pub const COMMAND_HELP: &str = "$ODOMETERS - list odometer log\r\n\
$ODOMETERS=PREV - list previous odometer log when available\r\n\
$ODOMETERS=RST - copy current log to previous and clear current";
