// One speed test measurement. Stored as one row of the speedtest table.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serialize;

/// A single measurement event. A metric is `None` when the probe could not measure it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
    /// Mb/s
    pub upload: Option<f64>,
    /// Mb/s
    pub download: Option<f64>,
    /// ms
    pub ping: Option<f64>,
}

impl Sample {
    /// Sample at `timestamp`, truncated to the millisecond precision kept on disk.
    pub fn new(
        timestamp: DateTime<Utc>,
        upload: Option<f64>,
        download: Option<f64>,
        ping: Option<f64>,
    ) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(3),
            upload,
            download,
            ping,
        }
    }

    /// Sample stamped with the current time.
    pub fn now(upload: Option<f64>, download: Option<f64>, ping: Option<f64>) -> Self {
        Self::new(Utc::now(), upload, download, ping)
    }

    /// On-disk / CSV form of the timestamp.
    pub fn time_string(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// True when the probe produced no metric at all.
    pub fn is_empty(&self) -> bool {
        self.upload.is_none() && self.download.is_none() && self.ping.is_none()
    }
}

/// ISO-8601 with milliseconds and `Z`, e.g. `2024-01-01T00:00:00.000Z`.
/// Fixed width, so stored values sort lexicographically in time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|ts| ts.with_timezone(&Utc))
}
