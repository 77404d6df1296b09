//! Aggregation & currency-conversion engine
//!
//! Stateless and synchronous: every call reads an immutable snapshot of
//! the ledger and returns derived values. Nothing in here is fatal;
//! malformed records degrade with a log instead of an error.

pub mod aggregate;
pub mod loans;
pub mod rates;
pub mod snapshot;

// Re-export main types for cleaner imports
pub use aggregate::{AggregateResult, aggregate};
pub use loans::current_obligations;
pub use rates::{RateGraph, RateResolver};
pub use snapshot::latest_valuation;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

/// Parses a record timestamp leniently: RFC 3339, then a bare datetime,
/// then a bare date. An unparsable value maps to the minimum instant so
/// it sorts last and a malformed record can never win "latest".
pub fn parse_instant(raw: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return naive.and_utc();
        }
    }
    warn!(timestamp = raw, "Malformed timestamp, treating as minimum");
    DateTime::<Utc>::MIN_UTC
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_instant("2024-03-01T10:30:00Z");
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T10:30:00+00:00");
    }

    #[test]
    fn test_parse_datetime_and_date() {
        assert_eq!(
            parse_instant("2024-03-01 10:30:00"),
            parse_instant("2024-03-01T10:30:00Z")
        );
        assert_eq!(
            parse_instant("2024-03-01"),
            parse_instant("2024-03-01T00:00:00Z")
        );
    }

    #[test]
    fn test_malformed_timestamp_sorts_last() {
        let bad = parse_instant("not-a-date");
        assert_eq!(bad, DateTime::<Utc>::MIN_UTC);
        assert!(bad < parse_instant("1970-01-01"));
    }
}
