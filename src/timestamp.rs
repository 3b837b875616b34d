//! Start-time parsing for metadata entries.
//!
//! The metadata export stores `start_time` as six loosely separated numeric
//! fields, e.g. `[2010.  7.  21.  15.  0.  35.093]` or `2010, 7, 21, 14, 30, 15.5`.
//! Separators may be any mix of commas and whitespace, and missing fields show
//! up as repeated separators. Anything that does not resolve to exactly six
//! numeric fields forming a valid calendar datetime becomes `None`.

use crate::error::ValueParseError;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

const FIELD_COUNT: usize = 6;

/// Parse a start-time string, logging and returning `None` on failure
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    match try_parse_start_time(raw) {
        Ok(datetime) => Some(datetime),
        Err(e) => {
            warn!("Could not parse start_time '{}': {}", raw, e);
            None
        }
    }
}

/// Parse a start-time string, reporting why it was rejected
pub fn try_parse_start_time(raw: &str) -> Result<NaiveDateTime, ValueParseError> {
    let fields = split_fields(raw);
    if fields.len() != FIELD_COUNT {
        return Err(ValueParseError::FieldCount {
            found: fields.len(),
        });
    }

    let mut integers = [0i64; FIELD_COUNT - 1];
    for (slot, field) in integers.iter_mut().zip(&fields) {
        *slot = coerce_integer(field).ok_or_else(|| ValueParseError::NonNumericField {
            field: field.to_string(),
        })?;
    }

    let seconds_field = fields[FIELD_COUNT - 1];
    let seconds = seconds_field
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .ok_or_else(|| ValueParseError::NonNumericField {
            field: seconds_field.to_string(),
        })?;

    let [year, month, day, hour, minute] = integers;
    build_datetime(year, month, day, hour, minute, seconds).ok_or(ValueParseError::InvalidDateTime)
}

/// Split on any run of commas and whitespace, dropping empty fields
fn split_fields(raw: &str) -> Vec<&str> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect()
}

/// Accept integer text as well as integral floats such as `2010.`
fn coerce_integer(field: &str) -> Option<i64> {
    if let Ok(value) = field.parse::<i64>() {
        return Some(value);
    }
    let value = field.parse::<f64>().ok()?;
    if !value.is_finite() || value.abs() > i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

fn build_datetime(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    seconds: f64,
) -> Option<NaiveDateTime> {
    if seconds < 0.0 {
        return None;
    }
    let whole = seconds.trunc();
    let micros = (((seconds - whole) * 1e6).round() as u32).min(999_999);

    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )?
    .and_hms_micro_opt(
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(whole as i64).ok()?,
        micros,
    )
}
