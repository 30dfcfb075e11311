//! Fill [`timeseries::Series`] containers from external column sources.
//!
//! - [`source`]: the [`RowSource`] trait, schema matching and [`load`]
//! - [`csv_source`]: headed CSV files
//! - [`config`]: TOML description of a CSV-backed series

pub mod config;
pub mod csv_source;
pub mod errors;
pub mod source;

pub use config::{LoadConfig, load_config_path, load_config_str};
pub use csv_source::CsvSource;
pub use errors::LoadError;
pub use source::{LoadReport, MemorySource, Row, RowSource, TimeRange, columns_match_schema, load};
