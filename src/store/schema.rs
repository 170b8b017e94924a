// speedtest table: one row per sample. Columns match data.db files written by earlier
// releases, so those databases open unchanged.
// Every statement is IF NOT EXISTS; concurrent first runs from separate processes are safe.

use crate::error::Result;
use sqlx::SqlitePool;

/// Creates the speedtest table and its time index if not present.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS speedtest (
            upload REAL,
            download REAL,
            ping REAL,
            time TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_speedtest_time ON speedtest(time)")
        .execute(pool)
        .await?;

    Ok(())
}
