//! Unix timestamp conventions.
//!
//! - One stable epoch: Unix (1970-01-01T00:00:00Z), fixed at compile time.
//! - A [`Timestamp`] is a signed count of whole seconds since that epoch, UTC.

use chrono::{DateTime, TimeZone, Utc};

/// Seconds since the Unix epoch, UTC.
pub type Timestamp = i64;

/// Unix epoch start (1970-01-01T00:00:00Z).
pub const EPOCH: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// Number of seconds in a minute.
pub const SECS_PER_MINUTE: i64 = 60;
/// Number of seconds in an hour.
pub const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
/// Number of seconds in a day.
pub const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;
/// Number of seconds in a week.
pub const SECS_PER_WEEK: i64 = 7 * SECS_PER_DAY;

/// Convert a timestamp to a UTC datetime. `None` if it is outside chrono's range.
pub fn to_datetime(ts: Timestamp) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0).single()
}

/// Convert a UTC datetime to a timestamp, dropping sub-second precision.
pub fn from_datetime(dt: DateTime<Utc>) -> Timestamp {
    dt.signed_duration_since(EPOCH).num_seconds()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_zero() {
        assert_eq!(from_datetime(EPOCH), 0);
        assert_eq!(to_datetime(0), Some(EPOCH));
    }

    #[test]
    fn roundtrip_known_instant() {
        let dt = Utc.with_ymd_and_hms(2012, 10, 18, 16, 30, 0).unwrap();
        let ts = from_datetime(dt);
        assert_eq!(ts, 1_350_577_800);
        assert_eq!(to_datetime(ts), Some(dt));
    }

    #[test]
    fn pre_epoch_is_negative() {
        let dt = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(from_datetime(dt), -60);
    }
}
