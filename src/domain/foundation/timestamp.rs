//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Whole days from `other` until this timestamp, zero if already past.
    pub fn days_after(&self, other: &Timestamp) -> i64 {
        self.0.signed_duration_since(other.0).num_days().max(0)
    }

    /// Returns the (year, month) pair, used for bucketing stored objects.
    pub fn year_month(&self) -> (i32, u32) {
        (self.0.year(), self.0.month())
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn add_and_minus_days_are_inverse() {
        let ts = fixed("2024-01-15T10:30:00Z");
        assert_eq!(ts.add_days(30).minus_days(30), ts);
        assert!(ts.add_days(1).is_after(&ts));
        assert!(ts.minus_days(1).is_before(&ts));
    }

    #[test]
    fn days_after_clamps_at_zero() {
        let start = fixed("2024-01-15T00:00:00Z");
        let end = fixed("2024-01-25T00:00:00Z");
        assert_eq!(end.days_after(&start), 10);
        assert_eq!(start.days_after(&end), 0);
    }

    #[test]
    fn year_month_reports_calendar_fields() {
        assert_eq!(fixed("2024-03-01T00:00:00Z").year_month(), (2024, 3));
    }

    #[test]
    fn timestamp_serializes_to_rfc3339() {
        let json = serde_json::to_string(&fixed("2024-01-15T10:30:00Z")).unwrap();
        assert!(json.contains("2024-01-15T10:30:00"));
    }
}
