//! Frequency inference and resampling.
//!
//! The *fundamental frequency* of a series is the smallest gap between two
//! consecutive timestamps: the finest granularity actually present in the
//! data. A series may also carry a stored frequency (set explicitly or cached
//! by [`Series::infer_frequency`]); any change to the key set drops it.
//!
//! Resampling only goes coarser. Entries are grouped into buckets and each
//! bucket is folded with [`Record::absorb`]:
//! - bars: open of the first, max high, min low, close of the last, summed volume
//! - quotes: last bid/ask in the bucket
//!
//! The source series is never modified; the result is a new, independent series.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::Duration;
use tracing::debug;

use crate::bucket::{bucket_id, bucket_start, fixed_bucket_start};
use crate::errors::{Error, Result};
use crate::models::Record;
use crate::series::Series;
use crate::time::Timestamp;
use crate::timeframe::Timeframe;

/// Where fixed-width resampling buckets are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Buckets start at the series' first timestamp.
    #[default]
    Origin,
    /// Buckets start at multiples of the width since the Unix epoch.
    Epoch,
}

impl<R: Record> Series<R> {
    /// Minimum gap between consecutive timestamps.
    ///
    /// Errors:
    /// - [`Error::InsufficientData`] with fewer than two entries.
    /// - [`Error::OutOfRange`] if the gap does not fit a [`Duration`].
    pub fn fundamental_frequency(&self) -> Result<Duration> {
        let keys = self.data.keys();
        // gaps between extreme i64 keys need i128
        let gap = keys
            .clone()
            .zip(keys.skip(1))
            .map(|(prev, next)| *next as i128 - *prev as i128)
            .min()
            .ok_or(Error::InsufficientData { len: self.len() })?;
        i64::try_from(gap)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| Error::OutOfRange(format!("gap of {gap}s")))
    }

    /// The stored frequency, if one was set or inferred since the last key change.
    pub fn frequency(&self) -> Option<Duration> {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: Duration) {
        self.frequency = Some(frequency);
    }

    /// Compute the fundamental frequency and store it.
    pub fn infer_frequency(&mut self) -> Result<Duration> {
        let frequency = self.fundamental_frequency()?;
        self.frequency = Some(frequency);
        Ok(frequency)
    }

    /// Stored frequency if present, otherwise computed from the data.
    pub fn effective_frequency(&self) -> Result<Duration> {
        match self.frequency {
            Some(frequency) => Ok(frequency),
            None => self.fundamental_frequency(),
        }
    }

    /// Downsample into `freq`-wide buckets anchored at the first timestamp.
    ///
    /// See [`Series::resample_aligned`].
    pub fn resample(&self, freq: Duration) -> Result<Series<R>> {
        self.resample_aligned(freq, Alignment::Origin)
    }

    /// Downsample into `freq`-wide buckets with the given anchoring.
    ///
    /// Each output entry is keyed by its bucket start. The result is labelled
    /// `"{meta}@{secs}s"`, keeps the loaded flag and stores `freq` as its frequency.
    ///
    /// Errors:
    /// - [`Error::InvalidResampleFrequency`] if `freq` is not positive or is finer
    ///   than [`Series::effective_frequency`].
    /// - [`Error::InsufficientData`] with fewer than two entries.
    /// - [`Error::OutOfRange`] if a bucket start falls outside the `i64` range.
    pub fn resample_aligned(&self, freq: Duration, alignment: Alignment) -> Result<Series<R>> {
        let width = freq.num_seconds();
        self.check_target(width)?;

        let anchor = match alignment {
            Alignment::Origin => self.first()?,
            Alignment::Epoch => 0,
        };
        let data = self.bucketize(|ts| {
            fixed_bucket_start(ts, width, anchor)
                .ok_or_else(|| Error::OutOfRange(format!("{width}s bucket start for {ts}")))
        })?;

        let mut out = self.derived(data, format!("{}@{}s", self.meta(), width));
        out.frequency = Some(Duration::seconds(width));
        Ok(out)
    }

    /// Downsample into calendar buckets (Monday-based weeks, calendar months).
    ///
    /// Minute/hour/day buckets are epoch-aligned. The result is labelled
    /// `"{meta}@{tf}"`.
    ///
    /// Errors:
    /// - [`Error::InvalidResampleFrequency`] if the timeframe's shortest width is
    ///   finer than [`Series::effective_frequency`].
    /// - [`Error::InsufficientData`] with fewer than two entries.
    /// - [`Error::InvalidTimeframe`] if the timeframe is too wide to represent.
    pub fn resample_timeframe(&self, tf: Timeframe) -> Result<Series<R>> {
        self.check_target(tf.nominal_duration()?.num_seconds())?;

        let data = self.bucketize(|ts| {
            bucket_start(bucket_id(ts, tf), tf)
                .ok_or_else(|| Error::InvalidTimeframe(format!("{tf} bucket out of range at {ts}")))
        })?;

        let mut out = self.derived(data, format!("{}@{}", self.meta(), tf));
        out.frequency = tf.fixed_secs().and_then(Duration::try_seconds);
        Ok(out)
    }

    fn check_target(&self, requested: i64) -> Result<()> {
        if requested <= 0 {
            return Err(Error::InvalidResampleFrequency {
                requested,
                fundamental: None,
            });
        }
        if self.len() < 2 {
            return Err(Error::InsufficientData { len: self.len() });
        }
        let fundamental = self.effective_frequency()?;
        if requested < fundamental.num_seconds() {
            return Err(Error::InvalidResampleFrequency {
                requested,
                fundamental: Some(fundamental),
            });
        }
        Ok(())
    }

    // `bucket_of` must be monotonic so each bucket is folded in timestamp order
    fn bucketize<F>(&self, bucket_of: F) -> Result<BTreeMap<Timestamp, R>>
    where
        F: Fn(Timestamp) -> Result<Timestamp>,
    {
        let mut out: BTreeMap<Timestamp, R> = BTreeMap::new();
        for (ts, record) in self.iter() {
            match out.entry(bucket_of(ts)?) {
                Entry::Vacant(slot) => {
                    slot.insert(*record);
                }
                Entry::Occupied(mut slot) => slot.get_mut().absorb(record),
            }
        }
        debug!(
            source = %self.meta(),
            rows = self.len(),
            buckets = out.len(),
            "resampled series"
        );
        Ok(out)
    }

    fn derived(&self, data: BTreeMap<Timestamp, R>, meta: String) -> Series<R> {
        let mut out: Series<R> = data.into_iter().collect();
        out.set_meta(meta);
        out.set_loaded(self.is_loaded());
        out
    }
}
