//! Projection views over a [`Series`].
//!
//! A view lets callers walk just the records ([`ValueView`]) or just the
//! timestamps ([`TimestampView`]) of a series as if they were separate
//! containers, without copying. Views are borrows handed out on demand by
//! [`Series::values_view`] / [`Series::timestamps_view`]; they are never stored
//! inside the series, so they always observe the series' current contents and
//! cannot outlive it.
//!
//! Every call to `iter()` starts a fresh traversal from the live series, so a
//! view can be walked any number of times.
//!
//! ```
//! use timeseries::{Bar, Series};
//!
//! let mut s: Series<Bar> = Series::new("demo");
//! s.insert(60, Bar::new(1.0, 3.0, 0.5, 2.0));
//! s.insert(0, Bar::new(2.0, 2.5, 1.0, 1.5));
//!
//! let ranges: Vec<f64> = s.values_view().iter().map(|b| b.range()).collect();
//! assert_eq!(ranges, vec![1.5, 2.5]);
//! assert_eq!(s.timestamps_view().iter().collect::<Vec<_>>(), vec![0, 60]);
//! ```

use std::collections::btree_map;
use std::iter::Copied;

use crate::models::Record;
use crate::series::Series;
use crate::time::Timestamp;

/// Iterator over the records of a series, ascending by timestamp.
pub type Values<'a, R> = btree_map::Values<'a, Timestamp, R>;

/// Iterator over mutable records of a series, ascending by timestamp.
pub type ValuesMut<'a, R> = btree_map::ValuesMut<'a, Timestamp, R>;

/// Iterator over the timestamps of a series, ascending.
pub type Timestamps<'a, R> = Copied<btree_map::Keys<'a, Timestamp, R>>;

impl<R: Record> Series<R> {
    /// Records-only view, timestamps erased.
    pub fn values_view(&self) -> ValueView<'_, R> {
        ValueView { series: self }
    }

    /// Records-only view with in-place mutation. Keys stay immutable.
    pub fn values_view_mut(&mut self) -> ValueViewMut<'_, R> {
        ValueViewMut { series: self }
    }

    /// Timestamps-only view, records erased.
    pub fn timestamps_view(&self) -> TimestampView<'_, R> {
        TimestampView { series: self }
    }
}

/// Read view producing the records of a [`Series`].
#[derive(Debug)]
pub struct ValueView<'a, R> {
    series: &'a Series<R>,
}

// manual impls: derive would require `R: Clone`
impl<R> Clone for ValueView<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ValueView<'_, R> {}

impl<'a, R: Record> ValueView<'a, R> {
    pub fn iter(&self) -> Values<'a, R> {
        self.series.data.values()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn first(&self) -> Option<&'a R> {
        self.series.data.first_key_value().map(|(_, v)| v)
    }

    pub fn last(&self) -> Option<&'a R> {
        self.series.data.last_key_value().map(|(_, v)| v)
    }
}

impl<'a, R: Record> IntoIterator for ValueView<'a, R> {
    type Item = &'a R;
    type IntoIter = Values<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, R: Record> IntoIterator for &ValueView<'a, R> {
    type Item = &'a R;
    type IntoIter = Values<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mutable view producing the records of a [`Series`].
#[derive(Debug)]
pub struct ValueViewMut<'a, R> {
    series: &'a mut Series<R>,
}

impl<R: Record> ValueViewMut<'_, R> {
    pub fn iter(&self) -> Values<'_, R> {
        self.series.data.values()
    }

    pub fn iter_mut(&mut self) -> ValuesMut<'_, R> {
        self.series.data.values_mut()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl<'a, R: Record> IntoIterator for ValueViewMut<'a, R> {
    type Item = &'a mut R;
    type IntoIter = ValuesMut<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        let series = self.series;
        series.data.values_mut()
    }
}

/// Read view producing the timestamps of a [`Series`].
#[derive(Debug)]
pub struct TimestampView<'a, R> {
    series: &'a Series<R>,
}

impl<R> Clone for TimestampView<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for TimestampView<'_, R> {}

impl<'a, R: Record> TimestampView<'a, R> {
    pub fn iter(&self) -> Timestamps<'a, R> {
        self.series.data.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn first(&self) -> Option<Timestamp> {
        self.series.first().ok()
    }

    pub fn last(&self) -> Option<Timestamp> {
        self.series.last().ok()
    }
}

impl<'a, R: Record> IntoIterator for TimestampView<'a, R> {
    type Item = Timestamp;
    type IntoIter = Timestamps<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, R: Record> IntoIterator for &TimestampView<'a, R> {
    type Item = Timestamp;
    type IntoIter = Timestamps<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
