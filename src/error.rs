// Typed failures for the store, the window resolver and the probe.

use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sample: {0}")]
    InvalidSample(String),
    #[error("stored timestamp {} is not ISO-8601", value.as_deref().unwrap_or("NULL"))]
    MalformedTimestamp {
        value: Option<String>,
        source: Option<chrono::ParseError>,
    },
    #[error("probe failed: {0}")]
    ProbeFailure(String),
    #[error("probe timed out after {0:?}")]
    ProbeTimeout(Duration),
    #[error("unknown period {0:?} (expected day, week or month)")]
    InvalidPeriod(String),
    #[error("window start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}
