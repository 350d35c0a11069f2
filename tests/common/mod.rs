use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use toman_ledger::{core::FixedClock, LedgerApp};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a temporary base directory kept alive until the test binary exits.
pub fn temp_base() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// 2024-03-10 12:00 UTC.
pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap())
}

/// Opens an app in an isolated directory with a fixed clock.
pub fn setup_test_app() -> LedgerApp {
    LedgerApp::open_with_clock(temp_base(), Box::new(fixed_clock())).expect("open ledger app")
}
