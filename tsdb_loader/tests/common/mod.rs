use std::{path::PathBuf, sync::Once};

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Route loader logs to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Write `body` to `name` inside a fresh temp dir. Keep the dir alive for the test.
pub fn write_fixture(name: &str, body: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    std::fs::write(&path, body).expect("write fixture");
    (dir, path)
}

pub const MINUTE_BARS: &str = "\
date_time,open,high,low,close,volume
2012-10-18 16:30:00,1.0,2.0,0.5,1.5,100
2012-10-18 16:31:00,1.5,2.5,1.0,2.0,200
2012-10-18 16:32:00,2.0,3.0,1.5,2.5,300
2012-10-18 16:33:00,2.5,4.5,2.0,4.0,400
2012-10-18 16:31:00,9.0,9.0,9.0,9.0,999
";
