//! CSV files as a [`RowSource`].
//!
//! The file must have a header row. One column holds the timestamp (named
//! [`DEFAULT_TIMESTAMP_COLUMN`] unless configured otherwise); every other
//! column is a candidate value column. Timestamps may be written as:
//! - integer Unix seconds (`1350577800`)
//! - `YYYY-MM-DD HH:MM:SS`, read as UTC
//! - `YYYY-MM-DD`, read as UTC midnight
//! - RFC 3339 (`2012-10-18T16:30:00Z`)

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use indexmap::IndexMap;
use timeseries::Timestamp;
use tracing::debug;

use crate::{
    errors::LoadError,
    source::{Row, RowSource, TimeRange},
};

pub const DEFAULT_TIMESTAMP_COLUMN: &str = "date_time";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A headed CSV file read on demand; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    timestamp_column: String,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
        }
    }

    pub fn with_timestamp_column(mut self, name: impl Into<String>) -> Self {
        self.timestamp_column = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }

    fn open(&self) -> Result<Reader<File>, LoadError> {
        Ok(ReaderBuilder::new().trim(Trim::All).from_path(&self.path)?)
    }

    /// Header name -> position, in file order.
    fn header(reader: &mut Reader<File>) -> Result<IndexMap<String, usize>, LoadError> {
        Ok(reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect())
    }

    fn timestamp_index(&self, header: &IndexMap<String, usize>) -> Result<usize, LoadError> {
        header
            .get(&self.timestamp_column)
            .copied()
            .ok_or_else(|| LoadError::MissingTimestampColumn(self.timestamp_column.clone()))
    }
}

impl RowSource for CsvSource {
    fn column_names(&mut self) -> Result<Vec<String>, LoadError> {
        let mut reader = self.open()?;
        let header = Self::header(&mut reader)?;
        self.timestamp_index(&header)?;
        Ok(header
            .into_keys()
            .filter(|name| *name != self.timestamp_column)
            .collect())
    }

    fn rows(&mut self, columns: &[&str], range: TimeRange) -> Result<Vec<Row>, LoadError> {
        let mut reader = self.open()?;
        let header = Self::header(&mut reader)?;
        let ts_idx = self.timestamp_index(&header)?;

        let mut positions = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();
        for name in columns {
            match header.get(*name) {
                Some(&i) => positions.push(i),
                None => missing.push((*name).to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(LoadError::ColumnMismatch {
                schema: "csv",
                missing,
            });
        }

        let mut out = Vec::new();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            let line = record.position().map_or(0, |p| p.line());
            let raw_ts = record.get(ts_idx).unwrap_or_default();
            let ts = parse_timestamp(raw_ts).ok_or_else(|| LoadError::Parse {
                line,
                column: self.timestamp_column.clone(),
                value: raw_ts.to_string(),
            })?;
            if !range.contains(ts) {
                continue;
            }

            let mut values = Vec::with_capacity(positions.len());
            for (&i, name) in positions.iter().zip(columns) {
                let raw = record.get(i).unwrap_or_default();
                let value = raw.parse::<f64>().map_err(|_| LoadError::Parse {
                    line,
                    column: (*name).to_string(),
                    value: raw.to_string(),
                })?;
                values.push(value);
            }
            out.push((ts, values));
        }

        debug!(path = %self.path.display(), rows = out.len(), "csv rows read");
        Ok(out)
    }
}

/// Parse one timestamp cell into Unix seconds. `None` if no accepted form matches.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(secs) = raw.parse::<i64>() {
        return Some(secs);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT) {
        return Some(dt.and_utc().timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(body: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn timestamp_forms() {
        assert_eq!(parse_timestamp("1350577800"), Some(1_350_577_800));
        assert_eq!(parse_timestamp("2012-10-18 16:30:00"), Some(1_350_577_800));
        assert_eq!(parse_timestamp("2012-10-18T16:30:00Z"), Some(1_350_577_800));
        assert_eq!(parse_timestamp("2012-10-18T18:30:00+02:00"), Some(1_350_577_800));
        assert_eq!(parse_timestamp("1970-01-02"), Some(86_400));
        assert_eq!(parse_timestamp("-60"), Some(-60));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn column_names_exclude_timestamp() {
        let f = csv_file("date_time, bid, ask\n0, 1.0, 1.1\n");
        let mut src = CsvSource::new(f.path());
        assert_eq!(src.column_names().unwrap(), vec!["bid", "ask"]);
    }

    #[test]
    fn custom_timestamp_column() {
        let f = csv_file("ts,bid,ask\n60,1.0,1.1\n");
        let mut src = CsvSource::new(f.path());
        assert!(matches!(
            src.column_names(),
            Err(LoadError::MissingTimestampColumn(c)) if c == "date_time"
        ));

        let mut src = src.with_timestamp_column("ts");
        assert_eq!(
            src.rows(&["ask", "bid"], TimeRange::all()).unwrap(),
            vec![(60, vec![1.1, 1.0])]
        );
    }

    #[test]
    fn rows_filter_range() {
        let f = csv_file("date_time,bid,ask\n0,1,2\n60,3,4\n120,5,6\n");
        let mut src = CsvSource::new(f.path());
        let rows = src
            .rows(&["bid", "ask"], TimeRange::new(Some(60), Some(60)))
            .unwrap();
        assert_eq!(rows, vec![(60, vec![3.0, 4.0])]);
    }

    #[test]
    fn bad_cells_report_line_and_column() {
        let f = csv_file("date_time,bid,ask\n0,1,2\n60,oops,4\n");
        let mut src = CsvSource::new(f.path());
        let err = src.rows(&["bid", "ask"], TimeRange::all()).unwrap_err();
        match err {
            LoadError::Parse {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "bid");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut src = CsvSource::new("/definitely/not/here.csv");
        assert!(matches!(src.column_names(), Err(LoadError::Csv(_))));
    }
}
