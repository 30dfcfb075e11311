use thiserror::Error;
use timeseries::Timestamp;

/// Errors raised while filling a [`Series`](timeseries::Series) from a row source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The requested date range has its start after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: Timestamp, end: Timestamp },

    /// The source lacks one or more columns the record schema needs.
    #[error("Column mismatch for {schema}: source is missing {missing:?}")]
    ColumnMismatch {
        schema: &'static str,
        missing: Vec<String>,
    },

    /// The configured timestamp column is not present in the source header.
    #[error("Timestamp column '{0}' not found")]
    MissingTimestampColumn(String),

    /// A cell could not be parsed as a timestamp or number.
    #[error("Cannot parse {value:?} in column '{column}' at line {line}")]
    Parse {
        line: u64,
        column: String,
        value: String,
    },

    /// An error from the CSV reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// A record could not be built from a row.
    #[error("Series error: {0}")]
    Series(#[from] timeseries::Error),
}
