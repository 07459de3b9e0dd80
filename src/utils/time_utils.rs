use crate::model::error::RankError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Parses an externally supplied timestamp.
///
/// Accepted forms:
/// - integer seconds since the Unix epoch (`1700000000`)
/// - RFC 3339 (`2024-01-01T12:00:00+02:00`)
/// - RFC 2822 (`Mon, 01 Jan 2024 12:00:00 +0000`)
/// - `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`, read as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, RankError> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<i64>() {
        return DateTime::from_timestamp(seconds, 0)
            .map(|t| t.fixed_offset())
            .ok_or_else(|| RankError::InvalidTimestamp(format!("{} is out of range", value)));
    }

    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t);
    }

    if let Ok(t) = DateTime::parse_from_rfc2822(value) {
        return Ok(t);
    }

    if let Ok(t) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(t.and_utc().fixed_offset());
    }

    if let Some(t) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(t.and_utc().fixed_offset());
    }

    Err(RankError::InvalidTimestamp(format!("unrecognized format: '{}'", value)))
}
