//! The time-indexed record container.
//!
//! A [`Series`] is a sorted mapping from [`Timestamp`] to one [`Record`] of a
//! single schema. Keys are unique and always traversed in ascending order,
//! regardless of insertion order. Alongside the data it carries a free-form
//! metadata label, an advisory `loaded` flag, and an optional stored
//! fundamental frequency (see [`crate::frequency`]).
//!
//! Copy, move and swap are plain value semantics:
//! - [`Clone`] gives a fully independent deep copy.
//! - [`Series::take`] moves the contents out, leaving the source empty and unloaded.
//! - [`Series::assign`] and [`Series::swap`] replace or exchange entire state.
//!
//! Views ([`crate::views`]) are borrows created on demand, so none of these
//! operations can leave a view bound to the wrong data.
//!
//! ```
//! use timeseries::{Bar, Series};
//!
//! let mut s: Series<Bar> = Series::new("spx");
//! assert!(s.insert(160, Bar::new(2.0, 2.5, 1.5, 2.0)));
//! assert!(s.insert(100, Bar::new(1.0, 1.5, 0.5, 1.0)));
//! assert!(!s.insert(100, Bar::new(9.0, 9.0, 9.0, 9.0)));
//! assert_eq!(s.timestamps(), vec![100, 160]);
//! assert_eq!(s.get(100).unwrap().close, 1.0);
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::mem;
use std::ops::RangeBounds;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::models::Record;
use crate::time::{Timestamp, to_datetime};

/// A sorted, schema-typed container of records keyed by Unix timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series<R> {
    pub(crate) data: BTreeMap<Timestamp, R>,
    meta: String,
    loaded: bool,
    #[serde(skip)]
    pub(crate) frequency: Option<Duration>,
}

impl<R: Record> Default for Series<R> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<R: Record> Series<R> {
    /// Create an empty series with a metadata label.
    pub fn new(meta: impl Into<String>) -> Self {
        Self {
            data: BTreeMap::new(),
            meta: meta.into(),
            loaded: false,
            frequency: None,
        }
    }

    // ----- mutators -----

    /// Insert a record at `ts`.
    ///
    /// Returns `false` and leaves the existing record untouched when `ts` is
    /// already present.
    pub fn insert(&mut self, ts: Timestamp, record: R) -> bool {
        match self.data.entry(ts) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
                self.frequency = None;
                true
            }
        }
    }

    /// Remove and return the record at `ts`.
    pub fn remove(&mut self, ts: Timestamp) -> Option<R> {
        let removed = self.data.remove(&ts);
        if removed.is_some() {
            self.frequency = None;
        }
        removed
    }

    /// Drop all entries. Label and loaded flag are kept.
    pub fn clear(&mut self) {
        self.data.clear();
        self.frequency = None;
    }

    // ----- accessors -----

    pub fn get(&self, ts: Timestamp) -> Option<&R> {
        self.data.get(&ts)
    }

    /// Mutable access to a record. Keys can only change through remove + insert.
    pub fn get_mut(&mut self, ts: Timestamp) -> Option<&mut R> {
        self.data.get_mut(&ts)
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.data.contains_key(&ts)
    }

    /// Earliest timestamp.
    ///
    /// Errors:
    /// - [`Error::EmptySeries`] if the series has no entries.
    pub fn first(&self) -> Result<Timestamp> {
        self.data
            .first_key_value()
            .map(|(ts, _)| *ts)
            .ok_or(Error::EmptySeries)
    }

    /// Latest timestamp.
    ///
    /// Errors:
    /// - [`Error::EmptySeries`] if the series has no entries.
    pub fn last(&self) -> Result<Timestamp> {
        self.data
            .last_key_value()
            .map(|(ts, _)| *ts)
            .ok_or(Error::EmptySeries)
    }

    /// Last entry at or before `ts`.
    pub fn on_or_before(&self, ts: Timestamp) -> Option<(Timestamp, &R)> {
        self.data
            .range(..=ts)
            .next_back()
            .map(|(k, v)| (*k, v))
    }

    /// First entry at or after `ts`.
    pub fn on_or_after(&self, ts: Timestamp) -> Option<(Timestamp, &R)> {
        self.data.range(ts..).next().map(|(k, v)| (*k, v))
    }

    /// Entries whose timestamps fall inside `bounds`, ascending.
    pub fn range<B>(&self, bounds: B) -> Range<'_, R>
    where
        B: RangeBounds<Timestamp>,
    {
        Range {
            inner: self.data.range(bounds),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Snapshot of all timestamps in ascending order.
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.data.keys().copied().collect()
    }

    /// One schema field across all entries, in timestamp order.
    ///
    /// Errors:
    /// - [`Error::ColumnNotFound`] if `name` is not a field of `R`.
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        if !R::FIELD_NAMES.contains(&name) {
            return Err(Error::ColumnNotFound(name.to_string()));
        }
        Ok(self.data.values().filter_map(|r| r.field(name)).collect())
    }

    pub fn column_names(&self) -> Vec<String> {
        R::column_names()
    }

    // ----- iteration -----

    pub fn iter(&self) -> Iter<'_, R> {
        Iter {
            inner: self.data.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, R> {
        IterMut {
            inner: self.data.iter_mut(),
        }
    }

    // ----- metadata -----

    pub fn meta(&self) -> &str {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: impl Into<String>) {
        self.meta = meta.into();
    }

    /// Advisory flag set once population is believed complete.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Label, dimensions and time span, for display.
    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            meta: self.meta.clone(),
            schema: R::SCHEMA,
            rows: self.len(),
            columns: self.column_names(),
            first: self.first().ok(),
            last: self.last().ok(),
        }
    }

    // ----- copy / move / swap -----

    /// Move the contents out, leaving `self` empty and unloaded.
    ///
    /// The returned series holds the mapping, loaded flag and stored frequency;
    /// it gets a copy of the label, which `self` keeps.
    pub fn take(&mut self) -> Series<R> {
        let moved = Series {
            data: mem::take(&mut self.data),
            meta: self.meta.clone(),
            loaded: self.loaded,
            frequency: self.frequency.take(),
        };
        self.loaded = false;
        moved
    }

    /// Replace the entire state of `self` with `other`.
    ///
    /// The new state is built before anything is touched, so this either fully
    /// succeeds or leaves `self` unchanged.
    pub fn assign(&mut self, mut other: Series<R>) -> &mut Self {
        self.swap(&mut other);
        self
    }

    /// Exchange the entire state of two series in constant time.
    pub fn swap(&mut self, other: &mut Series<R>) {
        mem::swap(self, other);
    }
}

// ----- iterators -----

/// Ascending `(timestamp, &record)` pairs of a [`Series`].
#[derive(Debug, Clone)]
pub struct Iter<'a, R> {
    inner: btree_map::Iter<'a, Timestamp, R>,
}

impl<'a, R> Iterator for Iter<'a, R> {
    type Item = (Timestamp, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<R> DoubleEndedIterator for Iter<'_, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (*k, v))
    }
}

impl<R> ExactSizeIterator for Iter<'_, R> {}

/// Entries of a [`Series`] inside a timestamp range, ascending.
#[derive(Debug, Clone)]
pub struct Range<'a, R> {
    inner: btree_map::Range<'a, Timestamp, R>,
}

impl<'a, R> Iterator for Range<'a, R> {
    type Item = (Timestamp, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (*k, v))
    }
}

impl<R> DoubleEndedIterator for Range<'_, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (*k, v))
    }
}

/// Ascending `(timestamp, &mut record)` pairs of a [`Series`].
#[derive(Debug)]
pub struct IterMut<'a, R> {
    inner: btree_map::IterMut<'a, Timestamp, R>,
}

impl<'a, R> Iterator for IterMut<'a, R> {
    type Item = (Timestamp, &'a mut R);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<R> DoubleEndedIterator for IterMut<'_, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (*k, v))
    }
}

impl<R> ExactSizeIterator for IterMut<'_, R> {}

impl<'a, R: Record> IntoIterator for &'a Series<R> {
    type Item = (Timestamp, &'a R);
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, R: Record> IntoIterator for &'a mut Series<R> {
    type Item = (Timestamp, &'a mut R);
    type IntoIter = IterMut<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Duplicates keep the first record, as with [`Series::insert`].
impl<R: Record> Extend<(Timestamp, R)> for Series<R> {
    fn extend<I: IntoIterator<Item = (Timestamp, R)>>(&mut self, iter: I) {
        for (ts, record) in iter {
            self.insert(ts, record);
        }
    }
}

impl<R: Record> FromIterator<(Timestamp, R)> for Series<R> {
    fn from_iter<I: IntoIterator<Item = (Timestamp, R)>>(iter: I) -> Self {
        let mut series = Series::default();
        series.extend(iter);
        series
    }
}

// ----- summary -----

/// Display-ready description of a [`Series`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub meta: String,
    pub schema: &'static str,
    pub rows: usize,
    pub columns: Vec<String>,
    pub first: Option<Timestamp>,
    pub last: Option<Timestamp>,
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Meta/Name: {}", self.meta)?;
        writeln!(
            f,
            "Dimensions: {} rows, {} columns",
            self.rows,
            self.columns.len() + 1
        )?;
        writeln!(f, "Columns: {}", self.columns.join(" "))?;
        writeln!(f, "First timestamp: {}", fmt_ts(self.first))?;
        write!(f, "Last timestamp: {}", fmt_ts(self.last))
    }
}

fn fmt_ts(ts: Option<Timestamp>) -> String {
    match ts.and_then(to_datetime) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
