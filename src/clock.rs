//! Clock-time helpers.
//!
//! The engine works in minutes from midnight (`u32`, 0..1440 for valid
//! same-day times); callers speak "HH:MM" strings. Wrapping past midnight
//! is out of scope, so conversions never carry a date.

use crate::error::ScheduleError;
use crate::types::Location;

/// Parse an "HH:MM" clock string into minutes since 00:00.
///
/// Rejects anything that is not two colon-separated integers with hours
/// 0-23 and minutes 0-59.
pub fn to_minutes(clock: &str) -> Result<u32, ScheduleError> {
    let invalid = || ScheduleError::InvalidClock(clock.to_string());

    let (hours, minutes) = clock.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

/// Render minutes since 00:00 as "HH:MM", wrapping hours modulo 24.
pub fn to_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

/// Add a duration to a clock string and render the result.
pub fn add_minutes(clock: &str, duration: u32) -> Result<String, ScheduleError> {
    Ok(to_clock(to_minutes(clock)? + duration))
}

/// Total footprint of a location in minutes: setup + shooting + teardown.
pub fn location_total_minutes(loc: &Location) -> u32 {
    loc.buffer_before + loc.shooting_duration + loc.buffer_after
}
