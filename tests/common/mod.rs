// Shared test helpers

use chrono::{DateTime, Duration, TimeZone, Utc};
use speedlog::models::Sample;
use speedlog::store::MeasurementStore;
use tempfile::TempDir;

/// 2024-01-01T00:00:00Z plus `offset_ms`.
pub fn at(offset_ms: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(offset_ms)
}

pub fn sample(offset_ms: i64, upload: f64, download: f64, ping: f64) -> Sample {
    Sample::new(at(offset_ms), Some(upload), Some(download), Some(ping))
}

pub fn empty_sample(offset_ms: i64) -> Sample {
    Sample::new(at(offset_ms), None, None, None)
}

/// Fresh store in a temp dir. Keep the TempDir alive for the test's duration.
pub fn temp_store() -> (TempDir, MeasurementStore) {
    let dir = TempDir::new().unwrap();
    let store = MeasurementStore::open(dir.path().join("speedtest.db")).unwrap();
    (dir, store)
}
