//! Fixed-pattern timestamps for Demo rows.
//!
//! Format: `YYYY-MM-DDTHH:MM:SS.fffffff+HH:MM` (seven fractional digits,
//! numeric UTC offset). The pattern never depends on locale.

use chrono::{DateTime, Local, TimeZone, Timelike};
use std::fmt::Display;

/// Current local time in the fixed pattern.
pub fn now() -> String {
    format(&Local::now())
}

/// Format any zoned timestamp in the fixed pattern.
pub fn format<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    // Leap seconds report nanos >= 1e9; fold them into the last tick.
    let nanos = at.nanosecond().min(999_999_999);
    format!(
        "{}.{:07}{}",
        at.format("%Y-%m-%dT%H:%M:%S"),
        nanos / 100,
        at.format("%:z")
    )
}
