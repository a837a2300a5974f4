//! Wall-clock presentation.
//!
//! The run loop owns the one-second tick and stamps the current time into
//! the app state; everything else goes through these two formatters.

use chrono::{DateTime, Local};

/// 12-hour clock with seconds and an AM/PM marker, e.g. "2:45:09 PM".
pub fn format_clock_time(t: &DateTime<Local>) -> String {
    t.format("%-I:%M:%S %p").to_string()
}

/// Long-form date, e.g. "Tuesday, January 7, 2025".
pub fn format_calendar_date(t: &DateTime<Local>) -> String {
    t.format("%A, %B %-d, %Y").to_string()
}
