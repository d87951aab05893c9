// --- File: crates/voxcal_webhook/src/datetime.rs ---
//! Date and time resolution for voice-supplied strings.
//!
//! All functions here are pure. Instants are always constructed in UTC
//! from the numeric components as spoken: a timezone hint changes only
//! how the instant is *displayed*, never the parse. Source times are
//! treated as already being in the target zone.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use thiserror::Error;

/// Duration assumed when the caller gives neither an end time nor an
/// explicit duration.
pub const DEFAULT_DURATION_MINUTES: i64 = 30;

#[derive(Error, Debug)]
pub enum DateTimeError {
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),
    #[error("invalid duration: {0} minutes")]
    InvalidDuration(i64),
}

/// Parse a date string into (year, month, day).
///
/// `-` means `YYYY-MM-DD`. `/` means a three-part numeric date with a
/// best-effort day/month guess: a first component above 12 forces
/// `DD/MM/YYYY`, anything else is read as `MM/DD/YYYY`. For dates where
/// both day and month are <= 12 (e.g. `03/04/2026`) the month-first
/// reading wins and may not match the speaker's intent.
fn parse_date(date_str: &str) -> Result<(i32, u32, u32), DateTimeError> {
    let invalid = || DateTimeError::InvalidDateFormat(date_str.to_string());

    if date_str.contains('-') {
        let parts: Vec<&str> = date_str.split('-').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let year: i32 = parts[0].trim().parse().map_err(|_| invalid())?;
        let month: u32 = parts[1].trim().parse().map_err(|_| invalid())?;
        let day: u32 = parts[2].trim().parse().map_err(|_| invalid())?;
        return Ok((year, month, day));
    }

    if date_str.contains('/') {
        let parts: Vec<&str> = date_str.split('/').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let first: u32 = parts[0].trim().parse().map_err(|_| invalid())?;
        let second: u32 = parts[1].trim().parse().map_err(|_| invalid())?;
        let year: i32 = parts[2].trim().parse().map_err(|_| invalid())?;
        let (month, day) = if first > 12 {
            (second, first)
        } else {
            (first, second)
        };
        return Ok((year, month, day));
    }

    Err(invalid())
}

/// Parse a time string into (hour, minute) on a 24-hour clock.
///
/// A trailing case-insensitive `am`/`pm` marker switches the string to
/// 12-hour interpretation (12 AM -> 0, 12 PM -> 12, other PM hours +12).
fn parse_time(time_str: &str) -> Result<(u32, u32), DateTimeError> {
    let invalid = || DateTimeError::InvalidTimeFormat(time_str.to_string());

    let lowered = time_str.trim().to_lowercase();
    let (clock, meridiem) = if let Some(stripped) = lowered.strip_suffix("pm") {
        (stripped.trim().to_string(), Some("pm"))
    } else if let Some(stripped) = lowered.strip_suffix("am") {
        (stripped.trim().to_string(), Some("am"))
    } else {
        (lowered, None)
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 2 {
        return Err(invalid());
    }
    let mut hour: u32 = parts[0].trim().parse().map_err(|_| invalid())?;
    let minute: u32 = parts[1].trim().parse().map_err(|_| invalid())?;

    match meridiem {
        Some(_) if hour == 0 || hour > 12 => return Err(invalid()),
        Some("am") if hour == 12 => hour = 0,
        Some("pm") if hour < 12 => hour += 12,
        _ => {}
    }

    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}

/// Resolve a (date, time) pair into an absolute instant.
///
/// `tz_hint` is accepted for parity with the display helpers but is
/// deliberately ignored here: the wall-clock components are taken as-is
/// and pinned to UTC. Changing the hint must never change the instant.
pub fn resolve(
    date_str: &str,
    time_str: &str,
    _tz_hint: Option<&str>,
) -> Result<DateTime<Utc>, DateTimeError> {
    let (year, month, day) = parse_date(date_str)?;
    let (hour, minute) = parse_time(time_str)?;

    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_else(|| DateTimeError::InvalidDateFormat(format!("{} {}", date_str, time_str)))
}

/// Duration in minutes between two time-of-day strings on the same day.
/// Zero and negative spans are rejected rather than silently booked.
pub fn duration_between(start_str: &str, end_str: &str) -> Result<i64, DateTimeError> {
    let (start_hour, start_minute) = parse_time(start_str)?;
    let (end_hour, end_minute) = parse_time(end_str)?;
    let minutes =
        (end_hour as i64 * 60 + end_minute as i64) - (start_hour as i64 * 60 + start_minute as i64);
    if minutes <= 0 {
        return Err(DateTimeError::InvalidDuration(minutes));
    }
    Ok(minutes)
}

/// Render an instant for text-to-speech, labelled with the caller's
/// timezone hint when it names a real zone. The wall clock shown is the
/// one that was parsed; the label is cosmetic.
pub fn spoken_time(instant: DateTime<Utc>, tz_hint: Option<&str>) -> String {
    let label = tz_hint
        .and_then(|hint| Tz::from_str(hint).ok())
        .map(|tz| tz.name().to_string())
        .unwrap_or_else(|| "UTC".to_string());
    format!("{} {}", instant.format("%A, %B %-d at %-I:%M %p"), label)
}
