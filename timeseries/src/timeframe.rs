//! Calendar-aware resampling widths.
//!
//! A plain [`chrono::Duration`] is enough for minute, hour and day buckets, but
//! weeks should start on Monday and months on the 1st regardless of their
//! length. [`Timeframe`] names such a width as an amount of a
//! [`TimeframeUnit`] and is accepted by
//! [`Series::resample_timeframe`](crate::series::Series::resample_timeframe).
//!
//! ```
//! use timeseries::timeframe::{Timeframe, TimeframeUnit};
//!
//! let weekly: Timeframe = "2W".parse().unwrap();
//! assert_eq!(weekly.unit, TimeframeUnit::Week);
//! assert_eq!(weekly.amount.get(), 2);
//! assert_eq!(weekly.fixed_secs(), Some(14 * 86_400));
//! assert_eq!(weekly.to_string(), "2W");
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use chrono::Duration;

use crate::errors::Error;
use crate::time::{SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE, SECS_PER_WEEK};

/// Calendar unit of a [`Timeframe`]. All units are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeframeUnit {
    Minute,
    Hour,
    Day,
    /// Starts on Monday.
    Week,
    /// Starts on the 1st; variable length.
    Month,
}

impl TimeframeUnit {
    /// Seconds in one unit, `None` for months.
    pub const fn secs(self) -> Option<i64> {
        match self {
            TimeframeUnit::Minute => Some(SECS_PER_MINUTE),
            TimeframeUnit::Hour => Some(SECS_PER_HOUR),
            TimeframeUnit::Day => Some(SECS_PER_DAY),
            TimeframeUnit::Week => Some(SECS_PER_WEEK),
            TimeframeUnit::Month => None,
        }
    }

    /// Single-character suffix used in the string form.
    pub const fn suffix(self) -> char {
        match self {
            TimeframeUnit::Minute => 'm',
            TimeframeUnit::Hour => 'h',
            TimeframeUnit::Day => 'D',
            TimeframeUnit::Week => 'W',
            TimeframeUnit::Month => 'M',
        }
    }

    pub fn from_suffix(c: char) -> Option<Self> {
        [
            TimeframeUnit::Minute,
            TimeframeUnit::Hour,
            TimeframeUnit::Day,
            TimeframeUnit::Week,
            TimeframeUnit::Month,
        ]
        .into_iter()
        .find(|unit| unit.suffix() == c)
    }
}

/// `amount` consecutive `unit`s, e.g. 15 minutes or 3 months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeframe {
    pub amount: NonZeroU32,
    pub unit: TimeframeUnit,
}

impl Timeframe {
    pub const fn new(amount: NonZeroU32, unit: TimeframeUnit) -> Self {
        Self { amount, unit }
    }

    /// Bucket width in seconds, `None` for months.
    pub const fn fixed_secs(&self) -> Option<i64> {
        match self.unit.secs() {
            Some(secs) => Some(secs * self.amount.get() as i64),
            None => None,
        }
    }

    /// Shortest possible bucket width. Months count as 28 days.
    ///
    /// Errors:
    /// - [`Error::InvalidTimeframe`] if the width exceeds what a [`Duration`] can hold.
    pub fn nominal_duration(&self) -> Result<Duration, Error> {
        let width = match self.fixed_secs() {
            Some(secs) => Duration::try_seconds(secs),
            None => Duration::try_days(28 * self.amount.get() as i64),
        };
        width.ok_or_else(|| Error::InvalidTimeframe(format!("{self} is too wide")))
    }
}

/// `"5m"`, `"4h"`, `"1D"`, `"1W"`, `"3M"`.
impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidTimeframe(s.to_string());

        let suffix = s.chars().last().ok_or_else(invalid)?;
        let unit = TimeframeUnit::from_suffix(suffix).ok_or_else(invalid)?;
        let amount = s[..s.len() - suffix.len_utf8()]
            .parse::<NonZeroU32>()
            .map_err(|_| invalid())?;
        Ok(Timeframe::new(amount, unit))
    }
}
