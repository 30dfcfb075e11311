mod common;

use chrono::Duration;
use common::{MINUTE_BARS, init_tracing, write_fixture};
use timeseries::{Bar, BarWithVolume, Quote, Series};
use tsdb_loader::{CsvSource, LoadError, LoadReport, TimeRange, load, load_config_path};

#[test]
fn loads_bars_with_volume_and_ignores_duplicate_rows() {
    init_tracing();
    let (_dir, path) = write_fixture("es_1m.csv", MINUTE_BARS);

    let mut series: Series<BarWithVolume> = Series::new("ES");
    let report = load(&mut series, &mut CsvSource::new(&path), TimeRange::all()).unwrap();

    assert_eq!(
        report,
        LoadReport {
            inserted: 4,
            duplicates: 1,
            skipped: 0
        }
    );
    assert!(series.is_loaded());
    assert_eq!(series.first().unwrap(), 1_350_577_800);
    // first occurrence wins
    assert_eq!(series.get(1_350_577_860).unwrap().volume, 200);
    assert_eq!(series.fundamental_frequency().unwrap(), Duration::minutes(1));
}

#[test]
fn volume_column_is_optional_for_plain_bars() {
    init_tracing();
    let (_dir, path) = write_fixture("es_1m.csv", MINUTE_BARS);

    let mut series: Series<Bar> = Series::new("ES");
    load(
        &mut series,
        &mut CsvSource::new(&path),
        TimeRange::new(Some(1_350_577_860), None),
    )
    .unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.column_names(), vec!["open", "high", "low", "close"]);
}

#[test]
fn quote_schema_does_not_match_bar_file() {
    init_tracing();
    let (_dir, path) = write_fixture("es_1m.csv", MINUTE_BARS);

    let mut series: Series<Quote> = Series::new("ES");
    let err = load(&mut series, &mut CsvSource::new(&path), TimeRange::all()).unwrap_err();
    match err {
        LoadError::ColumnMismatch { schema, missing } => {
            assert_eq!(schema, "Quote");
            assert_eq!(missing, vec!["bid", "ask"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(series.is_empty());
    assert!(!series.is_loaded());
}

#[test]
fn config_file_drives_a_load_then_resample() {
    init_tracing();
    let (dir, _csv) = write_fixture("es_1m.csv", MINUTE_BARS);
    let cfg_path = dir.path().join("es.toml");
    std::fs::write(
        &cfg_path,
        r#"
path = "es_1m.csv"
end = "2012-10-18T16:32:00Z"
"#,
    )
    .unwrap();

    let cfg = load_config_path(&cfg_path).unwrap();
    let (series, report) = cfg.load::<BarWithVolume>().unwrap();
    assert_eq!(series.meta(), "es_1m");
    assert_eq!(report.inserted, 3);

    let two_min = series.resample(Duration::minutes(2)).unwrap();
    assert_eq!(two_min.len(), 2);
    let first = two_min.values_view().first().copied().unwrap();
    assert_eq!(first.volume, 300);
    assert_eq!(first.bar().high, 2.5);
}
