//! Time and timestamp helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for a device's `created_at`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Format a timestamp as RFC 3339 with nanosecond precision.
///
/// The fixed width keeps lexical and chronological order identical, and the
/// full precision makes [`parse_rfc3339`] return the exact same instant.
#[must_use]
pub fn to_rfc3339(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC 3339 timestamp into UTC.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when `value` is not valid RFC 3339.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}
