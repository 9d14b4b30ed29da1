//! Database initialization
//!
//! Opens (or creates) the SQLite database and makes sure the upload record
//! schema exists. Safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL lets readers proceed while a request is writing
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_upload_records_table(&pool).await?;

    Ok(pool)
}

/// Create the upload record table and its session index (idempotent)
pub async fn create_upload_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS upload_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            session_id TEXT NOT NULL,
            segmented_at TEXT NOT NULL,
            output_path TEXT NOT NULL,
            speed_rating TEXT,
            effectiveness_rating TEXT,
            feedback_text TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // No UNIQUE here: repeated uploads for one session each get a row
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_upload_records_session ON upload_records(session_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
