use chrono::Duration;
use thiserror::Error;

/// The unified error type for the `timeseries` crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A record was built from a positional slice that is too short for its schema.
    #[error("Cannot build {schema} from {actual} values: {expected} required")]
    InvalidRecordInit {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },

    /// `first()`/`last()` were called on a series with no entries.
    #[error("Series is empty")]
    EmptySeries,

    /// Frequency inference and resampling need at least two entries.
    #[error("Insufficient data: {len} entries, at least 2 required")]
    InsufficientData { len: usize },

    /// The requested resampling frequency is non-positive or finer than the series' own.
    #[error("Invalid resample frequency {requested}s (fundamental: {fundamental:?})")]
    InvalidResampleFrequency {
        requested: i64,
        fundamental: Option<Duration>,
    },

    /// A column name does not belong to the record schema.
    #[error("Column '{0}' not found in record schema")]
    ColumnNotFound(String),

    /// Timestamp arithmetic left the range of `i64` seconds or of [`Duration`].
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A timeframe string could not be parsed.
    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),
}

/// A convenience type alias for `Result<T, timeseries::errors::Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
