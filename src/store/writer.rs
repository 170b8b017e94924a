// Append-only writes. Rows are never updated; the only other mutation is clear-all.

use crate::error::{Error, Result};
use crate::models::Sample;
use chrono::SubsecRound;
use sqlx::SqlitePool;

/// Inserts one row. Null metrics are stored as NULL.
pub async fn append(pool: &SqlitePool, sample: &Sample) -> Result<()> {
    validate(sample)?;
    sqlx::query("INSERT INTO speedtest (time, upload, download, ping) VALUES ($1, $2, $3, $4)")
        .bind(sample.time_string())
        .bind(sample.upload)
        .bind(sample.download)
        .bind(sample.ping)
        .execute(pool)
        .await?;
    Ok(())
}

/// Deletes every row; the table itself stays. Returns the number of rows removed.
pub async fn clear(pool: &SqlitePool) -> Result<u64> {
    let r = sqlx::query("DELETE FROM speedtest").execute(pool).await?;
    Ok(r.rows_affected())
}

/// Nulls are fine. NaN and infinities are not: SQLite stores NaN as NULL, so the value
/// would not read back. Timestamps must already be whole milliseconds, the precision
/// kept on disk.
pub fn validate(sample: &Sample) -> Result<()> {
    if sample.timestamp.trunc_subsecs(3) != sample.timestamp {
        return Err(Error::InvalidSample(format!(
            "timestamp {:?} is finer than a millisecond",
            sample.timestamp
        )));
    }
    let metrics = [
        ("upload", sample.upload),
        ("download", sample.download),
        ("ping", sample.ping),
    ];
    for (name, value) in metrics {
        if let Some(v) = value
            && !v.is_finite()
        {
            return Err(Error::InvalidSample(format!("{name} is {v}")));
        }
    }
    Ok(())
}
