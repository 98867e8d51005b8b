//! CF-convention time axis conversion
//!
//! Simulation output stores time as offsets such as
//! `seconds since 2008-03-01 00:00:00`. [`TimeUnits`] parses that attribute
//! once and converts raw axis values to UTC timestamps.

use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parsed `<unit> since <reference>` time units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    seconds_per_unit: i64,
    reference: DateTime<Utc>,
}

impl TimeUnits {
    /// Parse a CF `units` attribute
    pub fn parse(units: &str) -> Result<Self> {
        let (unit, reference) = units
            .split_once(" since ")
            .ok_or_else(|| Error::resource(format!("unrecognised time units '{}'", units)))?;

        let seconds_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => 1,
            "minutes" | "minute" | "mins" | "min" => 60,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600,
            "days" | "day" | "d" => 86_400,
            other => {
                return Err(Error::resource(format!("unsupported time unit '{}'", other)));
            }
        };

        Ok(Self {
            seconds_per_unit,
            reference: parse_reference(reference.trim())?,
        })
    }

    /// Reference instant of the axis
    pub fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Convert a raw axis value to an absolute timestamp
    ///
    /// Sub-millisecond fractions are rounded away.
    pub fn to_datetime(&self, value: f64) -> Result<DateTime<Utc>> {
        if !value.is_finite() {
            return Err(Error::resource(format!("non-finite time value {}", value)));
        }
        let millis = (value * self.seconds_per_unit as f64 * 1_000.0).round() as i64;
        Duration::try_milliseconds(millis)
            .and_then(|offset| self.reference.checked_add_signed(offset))
            .ok_or_else(|| Error::resource(format!("time value {} overflows", value)))
    }
}

fn parse_reference(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M:%S%.f %z"] {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    // Naive references are taken as UTC
    let naive = text.trim_end_matches(" UTC").trim_end_matches('Z');
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    Err(Error::resource(format!("unrecognised time reference '{}'", text)))
}
