//! UTC bucket mapping for resampling.
//!
//! - Fixed-size frames (minute/hour/day): second-based math against an anchor.
//! - Week: Monday 00:00:00Z aligned using a week epoch of 1969-12-29.
//! - Month: linear (year, month) indexing relative to 1970-01.
//!
//! Bucket ids are signed so timestamps before 1970 map to negative ids.

use chrono::Datelike;

use crate::time::{SECS_PER_DAY, SECS_PER_WEEK, Timestamp, to_datetime};
use crate::timeframe::{Timeframe, TimeframeUnit};

/// shift so Monday 1969-12-29 00:00Z becomes index 0
const WEEK_MONDAY_ANCHOR_OFFSET_SECS: i64 = 3 * SECS_PER_DAY; // +3d

/// Start of the fixed-width bucket containing `ts`, counted from `anchor`.
///
/// `width` must be positive. `None` if the start falls outside the `i64` range.
pub fn fixed_bucket_start(ts: Timestamp, width: i64, anchor: Timestamp) -> Option<Timestamp> {
    // i128 so extreme timestamps and anchors cannot overflow
    let (ts, width, anchor) = (ts as i128, width as i128, anchor as i128);
    let start = anchor + (ts - anchor).div_euclid(width) * width;
    i64::try_from(start).ok()
}

/// Compute the calendar bucket id for a timestamp.
///
/// Minute/hour/day ids are epoch-aligned; weeks start on Monday; months on the 1st.
pub fn bucket_id(ts: Timestamp, tf: Timeframe) -> i64 {
    let amount = tf.amount.get() as i64;
    match tf.unit {
        TimeframeUnit::Week => {
            let shifted = ts as i128 + WEEK_MONDAY_ANCHOR_OFFSET_SECS as i128;
            // quotient of an i128 near the i64 range by >= one week always fits
            shifted.div_euclid((SECS_PER_WEEK * amount) as i128) as i64
        }
        TimeframeUnit::Month => month_index(ts).div_euclid(amount),
        _ => {
            let width = tf.fixed_secs().unwrap_or(SECS_PER_DAY);
            ts.div_euclid(width)
        }
    }
}

/// Get the start timestamp for a bucket id. `None` past chrono's calendar range
/// or the `i64` range.
pub fn bucket_start(id: i64, tf: Timeframe) -> Option<Timestamp> {
    let amount = tf.amount.get() as i64;
    match tf.unit {
        TimeframeUnit::Week => {
            let width = SECS_PER_WEEK as i128 * amount as i128;
            // convert back to unix secs, subtract the +3d added on the way in
            let unix_secs = id as i128 * width - WEEK_MONDAY_ANCHOR_OFFSET_SECS as i128;
            i64::try_from(unix_secs).ok()
        }
        TimeframeUnit::Month => start_month(id.checked_mul(amount)?),
        _ => tf.fixed_secs().and_then(|width| id.checked_mul(width)),
    }
}

// Linear month index relative to 1970-01 (index 0).
fn month_index(ts: Timestamp) -> i64 {
    match to_datetime(ts) {
        Some(dt) => (dt.year() as i64 - 1970) * 12 + (dt.month0() as i64),
        None => ts.div_euclid(SECS_PER_DAY * 30),
    }
}

fn start_month(month_idx: i64) -> Option<Timestamp> {
    let year = 1970 + month_idx.div_euclid(12);
    let month = month_idx.rem_euclid(12) as u32 + 1; // 1..12
    let date = chrono::NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
    let dt = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(dt.timestamp())
}

// -------------------- tests --------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_datetime;
    use chrono::{TimeZone, Utc};
    use std::num::NonZeroU32;

    const M1: NonZeroU32 = match NonZeroU32::new(1) {
        Some(nz) => nz,
        None => unreachable!(),
    };

    #[test]
    fn fixed_bucket_respects_anchor() {
        assert_eq!(fixed_bucket_start(160, 120, 0), Some(120));
        assert_eq!(fixed_bucket_start(160, 120, 100), Some(100));
        assert_eq!(fixed_bucket_start(220, 120, 100), Some(220));
        assert_eq!(fixed_bucket_start(-1, 60, 0), Some(-60));
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        assert_eq!(
            fixed_bucket_start(i64::MAX, i64::MAX, i64::MIN),
            Some(i64::MAX - 1)
        );
        // floor(i64::MIN / 60) * 60 is below i64::MIN
        assert_eq!(fixed_bucket_start(i64::MIN, 60, 0), None);
        assert_eq!(fixed_bucket_start(i64::MIN, 60, i64::MIN), Some(i64::MIN));

        let week = Timeframe::new(M1, TimeframeUnit::Week);
        let id = bucket_id(i64::MAX, week);
        assert!(bucket_start(id, week).is_some_and(|start| i64::MAX - start < SECS_PER_WEEK));
        assert_eq!(bucket_start(i64::MAX, week), None);

        let minute = Timeframe::new(M1, TimeframeUnit::Minute);
        assert_eq!(bucket_start(i64::MAX, minute), None);
    }

    #[test]
    fn minute_roundtrip() {
        let tf = Timeframe::new(M1, TimeframeUnit::Minute);
        let t = from_datetime(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        let id = bucket_id(t, tf);
        assert_eq!(bucket_id(bucket_start(id, tf).unwrap(), tf), id);
    }

    #[test]
    fn week_starts_on_monday() {
        let tf = Timeframe::new(M1, TimeframeUnit::Week);
        // 2024-03-14 is a Thursday
        let t = from_datetime(Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap());
        let start = bucket_start(bucket_id(t, tf), tf).unwrap();
        let monday = from_datetime(Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());
        assert_eq!(start, monday);
    }

    #[test]
    fn month_boundaries() {
        let tf = Timeframe::new(M1, TimeframeUnit::Month);
        let t = from_datetime(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()); // leap day
        let id = bucket_id(t, tf);
        let start = bucket_start(id, tf).unwrap();
        assert_eq!(
            start,
            from_datetime(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            bucket_start(id + 1, tf).unwrap(),
            from_datetime(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn quarterly_months_group_by_three() {
        let tf = Timeframe::new(NonZeroU32::new(3).unwrap(), TimeframeUnit::Month);
        let may = from_datetime(Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap());
        assert_eq!(
            bucket_start(bucket_id(may, tf), tf).unwrap(),
            from_datetime(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap())
        );
    }
}
