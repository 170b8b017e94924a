// SQLite measurement store. One table (speedtest), append-only plus clear-all.
// The pool is lazy: nothing is opened until the first operation, and the schema is
// ensured once per handle before any read or write.

pub mod aggregation;
pub mod export;
pub mod schema;
pub mod writer;

use crate::error::{Error, Result};
use crate::models::{AggregateResult, Sample, parse_timestamp};
use crate::probe::{self, Probe};
use crate::window::Window;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::path::Path;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::instrument;

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct MeasurementStore {
    pool: SqlitePool,
    schema_ready: OnceCell<()>,
}

impl MeasurementStore {
    /// Store backed by the SQLite file at `path`. Creates the parent directory; the
    /// database file itself is created on first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, DEFAULT_BUSY_TIMEOUT)
    }

    pub fn open_with(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::StorageUnavailable(sqlx::Error::Io(e)))?;
        }
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(busy_timeout)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_lazy_with(opts);
        Ok(Self {
            pool,
            schema_ready: OnceCell::new(),
        })
    }

    /// Runs the schema step once per handle. A failed attempt is retried next call.
    async fn ensure_schema(&self) -> Result<()> {
        self.schema_ready
            .get_or_try_init(|| schema::ensure_schema(&self.pool))
            .await?;
        Ok(())
    }

    #[instrument(
        skip(self, sample),
        fields(repo = "speedtest", operation = "record", time = %sample.time_string())
    )]
    pub async fn record(&self, sample: &Sample) -> Result<()> {
        self.ensure_schema().await?;
        writer::append(&self.pool, sample).await?;
        tracing::debug!(empty = sample.is_empty(), "Sample recorded");
        Ok(())
    }

    /// Runs the probe, then records its sample. No connection is taken until the probe
    /// has returned; on probe failure or timeout nothing is written.
    #[instrument(skip(self, probe), fields(repo = "speedtest", operation = "measure"))]
    pub async fn measure<P: Probe>(&self, probe: &P, timeout: Duration) -> Result<Sample> {
        let sample = probe::run_probe(probe, timeout).await?;
        self.record(&sample).await?;
        Ok(sample)
    }

    /// Deletes every sample. Irreversible.
    #[instrument(skip(self), fields(repo = "speedtest", operation = "clear_all"))]
    pub async fn clear_all(&self) -> Result<u64> {
        self.ensure_schema().await?;
        let removed = writer::clear(&self.pool).await?;
        tracing::debug!(removed, "Samples cleared");
        Ok(removed)
    }

    /// Samples with `start <= time <= end`, ascending by time (ties in insertion order).
    #[instrument(skip(self), fields(repo = "speedtest", operation = "query"))]
    pub async fn query(&self, window: &Window) -> Result<Vec<Sample>> {
        self.ensure_schema().await?;
        let (start, end) = window.sql_bounds();
        let rows = sqlx::query(
            "SELECT time, upload, download, ping FROM speedtest
             WHERE ($1 IS NULL OR time >= $2) AND ($3 IS NULL OR time <= $4)
             ORDER BY time ASC, rowid ASC",
        )
        .bind(start.as_deref())
        .bind(start.as_deref())
        .bind(end.as_deref())
        .bind(end.as_deref())
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Self::parse_sample_row(&row)?);
        }
        tracing::debug!(samples_count = out.len(), "Samples loaded");
        Ok(out)
    }

    pub async fn stats(&self, window: &Window) -> Result<AggregateResult> {
        let samples = self.query(window).await?;
        Ok(aggregation::aggregate(&samples))
    }

    /// CSV text of the window; see [`export::export_csv`].
    pub async fn dump(&self, window: &Window) -> Result<String> {
        let samples = self.query(window).await?;
        export::export_csv(&samples)
    }

    pub async fn count(&self) -> Result<u64> {
        self.ensure_schema().await?;
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM speedtest")
            .fetch_one(&self.pool)
            .await?;
        Ok(n as u64)
    }

    /// Closes every pooled connection. Dropping the store releases them as well.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn parse_sample_row(row: &SqliteRow) -> Result<Sample> {
        // Legacy tables declare `time` nullable
        let Some(time) = row.try_get::<Option<String>, _>("time")? else {
            return Err(Error::MalformedTimestamp {
                value: None,
                source: None,
            });
        };
        let timestamp = parse_timestamp(&time).map_err(|source| Error::MalformedTimestamp {
            value: Some(time.clone()),
            source: Some(source),
        })?;
        Ok(Sample {
            timestamp,
            upload: row.try_get("upload")?,
            download: row.try_get("download")?,
            ping: row.try_get("ping")?,
        })
    }
}
