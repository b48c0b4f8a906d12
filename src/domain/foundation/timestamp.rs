//! Timestamp value object and business-local time helpers.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Negative if `other` is after `self`.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

/// The restaurant's wall clock.
///
/// Bookings store a naive local date and arrival time. The clock converts
/// them to instants using a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    offset: FixedOffset,
}

impl BusinessClock {
    /// Returns `None` when the offset is outside +/- 24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Local calendar date at the given instant.
    pub fn local_date(&self, at: &Timestamp) -> NaiveDate {
        at.as_datetime().with_timezone(&self.offset).date_naive()
    }

    /// The instant at which a local date and time occurs.
    pub fn instant_of(&self, date: NaiveDate, time: NaiveTime) -> Timestamp {
        let local = NaiveDateTime::new(date, time);
        let shift = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Timestamp((local - shift).and_utc())
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn manila() -> BusinessClock {
        BusinessClock::from_offset_minutes(480).unwrap()
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &Utc::now());
    }

    #[test]
    fn duration_since_is_signed() {
        let a = Timestamp::now();
        let b = a.plus(Duration::hours(2));
        assert_eq!(b.duration_since(&a), Duration::hours(2));
        assert_eq!(a.duration_since(&b), Duration::hours(-2));
        assert!(a.is_before(&b));
    }

    #[test]
    fn local_date_rolls_over_at_local_midnight() {
        // 16:30 UTC on Mar 1 is 00:30 on Mar 2 in UTC+8.
        let at = Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 3, 1, 16, 30, 0).unwrap());
        assert_eq!(manila().local_date(&at), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn instant_of_subtracts_offset() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let time = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let instant = manila().instant_of(date, time);
        assert_eq!(
            *instant.as_datetime(),
            Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_absurd_offsets() {
        assert!(BusinessClock::from_offset_minutes(24 * 60 + 1).is_none());
        assert!(BusinessClock::from_offset_minutes(-300).is_some());
    }
}
