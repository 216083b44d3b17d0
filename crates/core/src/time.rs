use std::env;

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{MergeError, Result};

/// Canonical display form of `request-time`: `yyyy-MM-dd HH:mm:ss <zone-abbreviation>`.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

const WALL_CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone used to render epoch timestamps for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone(Tz);

impl DisplayZone {
    /// Explicit name first, then `TZ`, then the system zone, then UTC.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        if let Some(name) = explicit {
            return Self::named(name);
        }

        if let Ok(name) = env::var("TZ")
            && let Ok(tz) = name.trim_start_matches(':').parse::<Tz>()
        {
            return Ok(Self(tz));
        }

        if let Ok(name) = iana_time_zone::get_timezone()
            && let Ok(tz) = name.parse::<Tz>()
        {
            return Ok(Self(tz));
        }

        Ok(Self::utc())
    }

    pub fn named(name: &str) -> Result<Self> {
        name.trim()
            .parse::<Tz>()
            .map(Self)
            .map_err(|e| MergeError::Config(format!("unknown time zone {name}: {e}")))
    }

    pub fn utc() -> Self {
        Self(Tz::UTC)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Renders epoch milliseconds in display form. `None` when the instant is out of range.
    pub fn format_epoch_millis(&self, millis: i64) -> Option<String> {
        self.0
            .timestamp_millis_opt(millis)
            .single()
            .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
    }
}

/// Parses a display-form timestamp into its wall-clock value. The date and time must be the
/// fixed-width `yyyy-MM-dd HH:mm:ss` form followed by one space and a zone abbreviation, which is
/// checked but not applied. The error is a reason; callers attach the source location.
pub fn parse_display(input: &str) -> std::result::Result<NaiveDateTime, String> {
    let (wall, rest) = NaiveDateTime::parse_and_remainder(input, WALL_CLOCK_FORMAT)
        .map_err(|e| e.to_string())?;

    let consumed = &input[..input.len() - rest.len()];
    if consumed != wall.format(WALL_CLOCK_FORMAT).to_string() {
        return Err("expected yyyy-MM-dd HH:mm:ss".to_string());
    }

    let zone = rest
        .strip_prefix(' ')
        .ok_or_else(|| "missing zone abbreviation".to_string())?;
    if !is_zone_abbreviation(zone) {
        return Err(format!("invalid zone abbreviation {zone:?}"));
    }
    Ok(wall)
}

/// `EST`, `ChST`, or a numeric offset such as `+04`, `-0330`.
fn is_zone_abbreviation(zone: &str) -> bool {
    if let Some(digits) = zone.strip_prefix(['+', '-']) {
        return (2..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());
    }
    (2..=6).contains(&zone.len()) && zone.bytes().all(|b| b.is_ascii_alphabetic())
}
