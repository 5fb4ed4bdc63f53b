//! Expiration date handling for new mappings.

use crate::error::ShortenerError;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};

/// Accepted format for caller-supplied expiration dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default lifetime of a mapping when the caller does not pick a date.
pub const DEFAULT_TTL: SignedDuration = SignedDuration::from_secs(7 * 24 * 60 * 60);

/// Parses a `YYYY-MM-DD` date into the instant it starts, in UTC.
///
/// Only the exact zero-padded shape is accepted: no sign, no whitespace, no
/// short years or single-digit months and days.
pub fn parse_expiration(input: &str) -> Result<Timestamp, ShortenerError> {
    if !has_date_shape(input) {
        return Err(ShortenerError::InvalidDate(format!(
            "'{input}': expected YYYY-MM-DD"
        )));
    }
    let date = Date::strptime(DATE_FORMAT, input)
        .map_err(|e| ShortenerError::InvalidDate(format!("'{input}': {e}")))?;
    let zoned = date
        .to_zoned(TimeZone::UTC)
        .map_err(|e| ShortenerError::InvalidDate(format!("'{input}': {e}")))?;
    Ok(zoned.timestamp())
}

fn has_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Resolves the expiration instant of a new mapping.
///
/// A supplied date wins; otherwise the record lives for `ttl` from `now`.
pub fn resolve_expiration(
    input: Option<&str>,
    now: Timestamp,
    ttl: SignedDuration,
) -> Result<Timestamp, ShortenerError> {
    match input {
        Some(date) => parse_expiration(date),
        None => now.checked_add(ttl).map_err(|e| {
            ShortenerError::Validation(format!("expiration is out of range: {e}"))
        }),
    }
}
