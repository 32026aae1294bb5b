//! Text reporting
//!
//! The host owns the output stream and message framing; the odometer hands
//! it finished lines through [`Reporter`].

use core::fmt::Write;

use heapless::String;

use crate::config::axis_letter;
use crate::storage::{InitError, OdometerRecord};

/// Longest single report line
pub const MAX_LINE_LEN: usize = 64;

/// Milliseconds per hour
const MS_PER_HOUR: u64 = 3_600_000;

/// Milliseconds per minute
const MS_PER_MINUTE: u64 = 60_000;

/// Framing the host applies to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// Informational line
    Plain,
    /// Warning shown to the user
    Warning,
}

/// Sink for user-visible output
pub trait Reporter {
    /// Emit one framed message line
    fn message(&mut self, kind: MessageKind, text: &str);

    /// Write raw text to the output stream, without framing
    fn write(&mut self, text: &str);
}

impl<T: Reporter + ?Sized> Reporter for &mut T {
    fn message(&mut self, kind: MessageKind, text: &str) {
        (**self).message(kind, text)
    }

    fn write(&mut self, text: &str) {
        (**self).write(text)
    }
}

/// Format a duration as `H:MM`, truncating seconds
///
/// Hours are not padded and may exceed 24.
pub fn format_hours(ms: u64, out: &mut impl Write) -> core::fmt::Result {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms / MS_PER_MINUTE) % 60;
    write!(out, "{}:{:02}", hours, minutes)
}

/// Format a stored distance (millimeters) as meters with one decimal
pub fn format_meters(distance_mm: f32, out: &mut impl Write) -> core::fmt::Result {
    write!(out, "{:.1}", distance_mm / 1000.0)
}

/// Report a record, one line per total
///
/// ```text
/// SPINDLEHRS 1:01
/// MOTORHRS 12:30
/// ODOMETERX 0.1
/// ODOMETERY 2.5
/// ODOMETERZ 0.0
/// ```
pub fn report_record<const N: usize>(record: &OdometerRecord<N>, out: &mut dyn Reporter) {
    let mut line: String<MAX_LINE_LEN> = String::new();

    // Lines are far shorter than MAX_LINE_LEN; a formatting error only
    // truncates the line.
    let _ = write!(line, "SPINDLEHRS ").and_then(|_| format_hours(record.spindle_ms, &mut line));
    out.message(MessageKind::Plain, &line);

    line.clear();
    let _ = write!(line, "MOTORHRS ").and_then(|_| format_hours(record.motor_ms, &mut line));
    out.message(MessageKind::Plain, &line);

    for (axis, &distance) in record.distance.iter().enumerate() {
        line.clear();
        let _ = write!(line, "ODOMETER{} ", axis_letter(axis))
            .and_then(|_| format_meters(distance, &mut line));
        out.message(MessageKind::Plain, &line);
    }
}

/// Show the startup warning for an odometer that could not be enabled
///
/// Call once, after [`Odometer::new`](crate::Odometer::new) failed.
pub fn report_init_error(error: InitError, out: &mut dyn Reporter) {
    out.message(MessageKind::Warning, error.message());
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use heapless::Vec;

    /// Reporter that keeps everything it is given
    #[derive(Debug, Default)]
    pub struct Capture {
        pub messages: Vec<(MessageKind, String<MAX_LINE_LEN>), 16>,
        pub raw: String<64>,
    }

    impl Capture {
        pub fn lines(&self) -> impl Iterator<Item = &str> {
            self.messages.iter().map(|(_, text)| text.as_str())
        }

        pub fn warnings(&self) -> usize {
            self.messages
                .iter()
                .filter(|(kind, _)| *kind == MessageKind::Warning)
                .count()
        }
    }

    impl Reporter for Capture {
        fn message(&mut self, kind: MessageKind, text: &str) {
            let mut line = String::new();
            let _ = line.push_str(text);
            let _ = self.messages.push((kind, line));
        }

        fn write(&mut self, text: &str) {
            let _ = self.raw.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Capture;
    use super::*;

    fn hours(ms: u64) -> String<16> {
        let mut s = String::new();
        format_hours(ms, &mut s).unwrap();
        s
    }

    fn meters(mm: f32) -> String<16> {
        let mut s = String::new();
        format_meters(mm, &mut s).unwrap();
        s
    }

    #[test]
    fn test_hours_truncate_seconds() {
        assert_eq!(hours(3_660_000), "1:01");
        assert_eq!(hours(3_719_999), "1:01");
        assert_eq!(hours(0), "0:00");
        assert_eq!(hours(59_999), "0:00");
        assert_eq!(hours(100 * 3_600_000 + 5 * 60_000), "100:05");
    }

    #[test]
    fn test_meters_one_decimal() {
        assert_eq!(meters(100.0), "0.1");
        assert_eq!(meters(0.0), "0.0");
        assert_eq!(meters(12_345.0), "12.3");
    }

    #[test]
    fn test_report_lines() {
        let record = OdometerRecord::<3> {
            motor_ms: 45_000_000,
            spindle_ms: 3_660_000,
            distance: [100.0, 2_500.0, 0.0],
        };
        let mut capture = Capture::default();
        report_record(&record, &mut capture);

        let mut lines = capture.lines();
        assert_eq!(lines.next(), Some("SPINDLEHRS 1:01"));
        assert_eq!(lines.next(), Some("MOTORHRS 12:30"));
        assert_eq!(lines.next(), Some("ODOMETERX 0.1"));
        assert_eq!(lines.next(), Some("ODOMETERY 2.5"));
        assert_eq!(lines.next(), Some("ODOMETERZ 0.0"));
        assert_eq!(lines.next(), None);
        assert_eq!(capture.warnings(), 0);
    }

    #[test]
    fn test_init_error_warning() {
        let mut capture = Capture::default();
        report_init_error(InitError::UnsupportedStorage, &mut capture);

        assert_eq!(capture.warnings(), 1);
        assert_eq!(
            capture.lines().next(),
            Some("EEPROM or FRAM is required for odometers!")
        );
    }
}
