//! Wall-clock formatting for refresh timestamps.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use chrono::{DateTime, Local, TimeZone};

/// `HH:MM` in 24-hour form, the way the dashboard header shows it.
#[must_use]
pub fn hour_minute<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M").to_string()
}

/// Current local time as `HH:MM`.
#[must_use]
pub fn local_hour_minute() -> String {
    hour_minute(&Local::now())
}
