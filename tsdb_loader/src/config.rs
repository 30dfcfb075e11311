//! TOML description of one CSV-backed series.
//!
//! ```toml
//! path = "data/eurusd.csv"
//! label = "EURUSD"
//! timestamp_column = "date_time"   # optional
//! start = "2012-10-18T00:00:00Z"   # optional, inclusive
//! end = "2012-10-19T00:00:00Z"     # optional, inclusive
//! ```
//!
//! Entrypoints:
//! - Parse from a TOML string: [`load_config_str`]
//! - Parse from a file, resolving a relative `path` against the file's directory: [`load_config_path`]
//!
//! In both cases a non-empty `TSDB_DATA_PATH` environment variable replaces `path`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timeseries::{Record, Series, time::from_datetime};
use toml::from_str;

use crate::{
    csv_source::{CsvSource, DEFAULT_TIMESTAMP_COLUMN},
    errors::LoadError,
    source::{LoadReport, TimeRange, load},
};

/// Environment variable overriding [`LoadConfig::path`].
pub const DATA_PATH_ENV: &str = "TSDB_DATA_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    /// CSV file to read.
    pub path: PathBuf,
    /// Series label; the file stem when absent.
    pub label: Option<String>,
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

fn default_timestamp_column() -> String {
    DEFAULT_TIMESTAMP_COLUMN.to_string()
}

impl LoadConfig {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start.map(from_datetime), self.end.map(from_datetime))
    }

    pub fn label(&self) -> String {
        self.label
            .clone()
            .or_else(|| {
                self.path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .unwrap_or_default()
    }

    pub fn source(&self) -> CsvSource {
        CsvSource::new(&self.path).with_timestamp_column(&self.timestamp_column)
    }

    /// Build a fresh series labelled [`Self::label`] and fill it from the configured file.
    pub fn load<R: Record>(&self) -> Result<(Series<R>, LoadReport), LoadError> {
        let mut series = Series::new(self.label());
        let report = load(&mut series, &mut self.source(), self.range())?;
        Ok((series, report))
    }
}

fn apply_env_override(cfg: &mut LoadConfig) {
    if let Ok(path) = std::env::var(DATA_PATH_ENV)
        && !path.trim().is_empty()
    {
        cfg.path = PathBuf::from(path.trim());
    }
}

/// Parse a [`LoadConfig`] from TOML text.
///
/// Errors:
/// - Malformed TOML, unknown keys, or unparseable `start`/`end`
/// - `start` later than `end`
pub fn load_config_str(toml_str: &str) -> anyhow::Result<LoadConfig> {
    let mut cfg: LoadConfig = from_str(toml_str).context("failed to parse load config TOML")?;
    apply_env_override(&mut cfg);
    cfg.range().validate().context("invalid load config")?;
    Ok(cfg)
}

/// Read a config file from disk and parse it. A relative `path` is taken
/// relative to the directory holding the config file.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<LoadConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read load config file {}", path.display()))?;
    let mut cfg = load_config_str(&text)?;
    if cfg.path.is_relative()
        && let Some(dir) = path.parent()
    {
        cfg.path = dir.join(&cfg.path);
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const FULL: &str = r#"
        path = "data/eurusd.csv"
        label = "EURUSD"
        timestamp_column = "ts"
        start = "2012-10-18T16:30:00Z"
        end = "2012-10-19T00:00:00Z"
    "#;

    fn clear_env() {
        // SAFETY: env-touching tests are #[serial].
        unsafe { std::env::remove_var(DATA_PATH_ENV) };
    }

    #[test]
    #[serial]
    fn parses_full_config() {
        clear_env();
        let cfg = load_config_str(FULL).unwrap();
        assert_eq!(cfg.label(), "EURUSD");
        assert_eq!(cfg.timestamp_column, "ts");
        assert_eq!(
            cfg.range(),
            TimeRange::new(Some(1_350_577_800), Some(1_350_604_800))
        );
        assert_eq!(cfg.source().timestamp_column(), "ts");
    }

    #[test]
    #[serial]
    fn defaults_fill_optional_fields() {
        clear_env();
        let cfg = load_config_str(r#"path = "/tmp/spy_1m.csv""#).unwrap();
        assert_eq!(cfg.label(), "spy_1m");
        assert_eq!(cfg.timestamp_column, DEFAULT_TIMESTAMP_COLUMN);
        assert_eq!(cfg.range(), TimeRange::all());
    }

    #[test]
    #[serial]
    fn rejects_unknown_keys_and_inverted_ranges() {
        clear_env();
        assert!(load_config_str("path = \"a.csv\"\ntable = \"x\"").is_err());

        let err = load_config_str(
            r#"
            path = "a.csv"
            start = "2020-01-02T00:00:00Z"
            end = "2020-01-01T00:00:00Z"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Invalid date range"));
    }

    #[test]
    #[serial]
    fn env_overrides_path() {
        // SAFETY: serialized with the other env tests.
        unsafe { std::env::set_var(DATA_PATH_ENV, "/srv/override.csv") };
        let cfg = load_config_str(FULL);
        clear_env();
        assert_eq!(cfg.unwrap().path, PathBuf::from("/srv/override.csv"));
    }

    #[test]
    #[serial]
    fn relative_path_resolves_against_config_dir() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("load.toml");
        std::fs::write(&cfg_path, "path = \"bars.csv\"\n").unwrap();

        let cfg = load_config_path(&cfg_path).unwrap();
        assert_eq!(cfg.path, dir.path().join("bars.csv"));
        assert!(load_config_path(dir.path().join("missing.toml")).is_err());
    }
}
