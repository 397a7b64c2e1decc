//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision, rendered as ISO8601 with Z suffix.
//!
//! ## Invariant
//!
//! Every timestamp in the stack is UTC. Regulatory deadlines are compared at
//! calendar-day granularity across record domains; mixing local offsets into
//! those comparisons would shift day boundaries per record. Non-UTC inputs
//! are **rejected at construction** on the strict path — there is no silent
//! conversion that could introduce ambiguity.
//!
//! A lenient parser exists for ingesting external store rows, which may
//! carry explicit offsets; it converts to UTC before the value enters the
//! system.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SklError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::parse_lenient()`] — from an ISO8601 string, converting to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only timestamps with the `Z` suffix are
    /// accepted. Explicit offsets like `+00:00`, `+05:30`, or `-04:00` are
    /// rejected — even `+00:00`, which is semantically equivalent to `Z`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The string is not valid RFC 3339.
    /// - The string uses a non-Z timezone offset.
    pub fn parse(s: &str) -> Result<Self, SklError> {
        if !s.ends_with('Z') {
            return Err(SklError::Validation(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| SklError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse a timestamp from an RFC 3339 string, accepting any timezone
    /// offset and converting to UTC.
    ///
    /// This is the lenient path for ingesting external record-store data.
    /// The result is always UTC with seconds precision, matching the strict
    /// invariant.
    pub fn parse_lenient(s: &str) -> Result<Self, SklError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| SklError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, SklError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| SklError::Validation(format!("invalid Unix timestamp: {secs}")))?;
        Ok(Self(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// The timestamp shifted forward by a whole number of days.
    ///
    /// Saturates at the chrono representable range rather than panicking;
    /// deadline helpers add at most a few months to present-day dates.
    pub fn plus_days(&self, days: i64) -> Self {
        match self.0.checked_add_signed(Duration::days(days)) {
            Some(dt) => Self(dt),
            None => *self,
        }
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-03-01T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 45).unwrap();
        let dt_with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(dt_with_nanos);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:30:45Z");
    }

    #[test]
    fn test_display_matches_iso8601() {
        let dt = Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(format!("{ts}"), ts.to_iso8601());
    }

    // ---- parse() strict mode ----

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_parse_plus_zero_rejected() {
        assert!(Timestamp::parse("2026-03-01T12:00:00+00:00").is_err());
    }

    #[test]
    fn test_parse_offset_rejected() {
        assert!(Timestamp::parse("2026-03-01T17:00:00+05:00").is_err());
        assert!(Timestamp::parse("2026-03-01T08:00:00-04:00").is_err());
    }

    #[test]
    fn test_parse_subseconds_truncated() {
        let ts = Timestamp::parse("2026-03-01T12:00:00.123456Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-03-01").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    // ---- parse_lenient() ----

    #[test]
    fn test_parse_lenient_converts_offset() {
        let ts = Timestamp::parse_lenient("2026-03-01T17:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_parse_lenient_accepts_z() {
        let ts = Timestamp::parse_lenient("2026-03-01T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    // ---- epoch ----

    #[test]
    fn test_epoch_roundtrip() {
        let ts = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        let ts2 = Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap();
        assert_eq!(ts, ts2);
    }

    // ---- plus_days ----

    #[test]
    fn test_plus_days() {
        let ts = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        assert_eq!(ts.plus_days(7).to_iso8601(), "2026-03-08T12:00:00Z");
        assert_eq!(ts.plus_days(-1).to_iso8601(), "2026-02-28T12:00:00Z");
        assert_eq!(ts.plus_days(0), ts);
    }

    // ---- ordering ----

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        let later = Timestamp::parse("2026-03-01T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    // ---- serde ----

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
