//! Time handling for forecast offsets.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Largest accepted hour offset (ten years).
pub const MAX_HOUR_OFFSET: u32 = 87_600;

/// A forecast snapshot: the dataset anchor date plus an hour offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidTime {
    /// Anchor date all offsets are relative to
    pub reference_time: DateTime<Utc>,
    /// Forecast hour offset from the anchor
    pub forecast_hour: u32,
}

impl ValidTime {
    pub fn new(reference_time: DateTime<Utc>, forecast_hour: u32) -> Self {
        Self {
            reference_time,
            forecast_hour,
        }
    }

    /// Calculate the actual valid time (reference + forecast offset).
    ///
    /// `None` if the sum falls outside the representable date range.
    pub fn valid_datetime(&self) -> Option<DateTime<Utc>> {
        let offset = TimeDelta::try_hours(i64::from(self.forecast_hour))?;
        self.reference_time.checked_add_signed(offset)
    }

    /// Short label used for chart axes, e.g. "15 Jan 06h".
    pub fn label(&self) -> Option<String> {
        self.valid_datetime()
            .map(|dt| dt.format("%d %b %Hh").to_string())
    }
}

/// Parse an hour-offset column name such as `"6h"`, `"06H"` or `"6"`.
///
/// Offsets above [`MAX_HOUR_OFFSET`] are rejected.
pub fn parse_hour_offset(column: &str) -> Result<u32, ParseError> {
    let trimmed = column.trim();
    let digits = trimmed
        .strip_suffix('h')
        .or_else(|| trimmed.strip_suffix('H'))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidHourOffset(column.to_string()));
    }

    digits
        .parse::<u32>()
        .ok()
        .filter(|hour| *hour <= MAX_HOUR_OFFSET)
        .ok_or_else(|| ParseError::InvalidHourOffset(column.to_string()))
}

/// Parse the `forecast_date` column.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` and a bare
/// `YYYY-MM-DD` (midnight UTC). Naive values are taken as UTC.
pub fn parse_forecast_date(s: &str) -> Result<DateTime<Utc>, ParseError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(ParseError::InvalidDate(s.to_string()))
}
