//! Row source abstraction for filling a [`Series`].
//!
//! A [`RowSource`] is anything that can list its columns and hand back rows of
//! numbers keyed by timestamp: a CSV file ([`crate::csv_source::CsvSource`]), an
//! in-memory table in tests, or a database table in an application. [`load`]
//! checks the source against the record schema, builds each record
//! positionally with [`Record::from_values`] and inserts it.
//!
//! ```
//! use timeseries::{Quote, Series};
//! use tsdb_loader::source::{MemorySource, TimeRange, load};
//!
//! let mut source = MemorySource::new(["bid", "ask"]);
//! source.push(60, [1.0, 1.1]);
//! source.push(0, [0.9, 1.0]);
//!
//! let mut series: Series<Quote> = Series::new("eurusd");
//! let report = load(&mut series, &mut source, TimeRange::all()).unwrap();
//! assert_eq!(report.inserted, 2);
//! assert!(series.is_loaded());
//! ```

use std::collections::HashSet;

use timeseries::{Record, Series, Timestamp};
use tracing::{info, warn};

use crate::errors::LoadError;

/// One source row: timestamp plus values in the requested column order.
pub type Row = (Timestamp, Vec<f64>);

/// Inclusive timestamp bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl TimeRange {
    pub const fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// No bounds.
    pub const fn all() -> Self {
        Self::new(None, None)
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start.is_none_or(|start| ts >= start) && self.end.is_none_or(|end| ts <= end)
    }

    /// Errors:
    /// - [`LoadError::InvalidRange`] if both bounds are set and `start > end`.
    pub fn validate(&self) -> Result<(), LoadError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => Err(LoadError::InvalidRange { start, end }),
            _ => Ok(()),
        }
    }
}

/// A column-oriented source of timestamped numeric rows.
pub trait RowSource {
    /// Names of the value columns (the timestamp column excluded).
    fn column_names(&mut self) -> Result<Vec<String>, LoadError>;

    /// Rows inside `range`, with values ordered as `columns`.
    fn rows(&mut self, columns: &[&str], range: TimeRange) -> Result<Vec<Row>, LoadError>;
}

/// Outcome of a [`load`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows that created a new entry.
    pub inserted: usize,
    /// Rows whose timestamp was already present; the existing record was kept.
    pub duplicates: usize,
    /// Rows the source returned outside the requested range.
    pub skipped: usize,
}

/// Schema fields of `R` absent from `available`. Order and extra columns are ignored.
pub fn missing_columns<R: Record>(available: &[String]) -> Vec<String> {
    let have: HashSet<&str> = available.iter().map(String::as_str).collect();
    R::FIELD_NAMES
        .iter()
        .filter(|name| !have.contains(*name))
        .map(|name| (*name).to_string())
        .collect()
}

/// True if `available` provides every field of `R`.
pub fn columns_match_schema<R: Record>(available: &[String]) -> bool {
    missing_columns::<R>(available).is_empty()
}

/// Fill `series` from `source`, then mark it loaded.
///
/// Existing entries are never overwritten; colliding rows are counted in
/// [`LoadReport::duplicates`]. On error `series` is left exactly as it was.
///
/// Errors:
/// - [`LoadError::InvalidRange`] if `range` is inverted
/// - [`LoadError::ColumnMismatch`] if the source lacks a schema column
/// - Source read or parse failures
/// - [`LoadError::Series`] if a row is too short for the schema
pub fn load<R, S>(
    series: &mut Series<R>,
    source: &mut S,
    range: TimeRange,
) -> Result<LoadReport, LoadError>
where
    R: Record,
    S: RowSource + ?Sized,
{
    range.validate()?;

    let available = source.column_names()?;
    let missing = missing_columns::<R>(&available);
    if !missing.is_empty() {
        return Err(LoadError::ColumnMismatch {
            schema: R::SCHEMA,
            missing,
        });
    }

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for (ts, values) in source.rows(R::FIELD_NAMES, range)? {
        if !range.contains(ts) {
            report.skipped += 1;
            continue;
        }
        records.push((ts, R::from_values(&values)?));
    }

    // all records are built before the first insert
    for (ts, record) in records {
        if series.insert(ts, record) {
            report.inserted += 1;
        } else {
            report.duplicates += 1;
        }
    }

    if report.duplicates > 0 {
        warn!(
            series = %series.meta(),
            duplicates = report.duplicates,
            "duplicate timestamps ignored"
        );
    }
    series.set_loaded(true);
    info!(
        series = %series.meta(),
        schema = R::SCHEMA,
        inserted = report.inserted,
        rows = series.len(),
        "series loaded"
    );
    Ok(report)
}

/// A table held in memory, mostly useful for tests and fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    columns: Vec<String>,
    rows: Vec<(Timestamp, Vec<f64>)>,
}

impl MemorySource {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; values follow the column order given to [`MemorySource::new`].
    pub fn push(&mut self, ts: Timestamp, values: impl Into<Vec<f64>>) {
        self.rows.push((ts, values.into()));
    }
}

impl RowSource for MemorySource {
    fn column_names(&mut self) -> Result<Vec<String>, LoadError> {
        Ok(self.columns.clone())
    }

    fn rows(&mut self, columns: &[&str], range: TimeRange) -> Result<Vec<Row>, LoadError> {
        let positions = columns
            .iter()
            .map(|name| {
                self.columns
                    .iter()
                    .position(|c| c == name)
                    .ok_or_else(|| LoadError::ColumnMismatch {
                        schema: "MemorySource",
                        missing: vec![(*name).to_string()],
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .rows
            .iter()
            .filter(|(ts, _)| range.contains(*ts))
            .map(|(ts, values)| {
                // short rows stay short so record construction reports them
                let picked = positions.iter().filter_map(|&i| values.get(i).copied()).collect();
                (*ts, picked)
            })
            .collect())
    }
}
