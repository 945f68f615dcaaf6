//! Database access for tutortrack-ri

pub mod ledger;
pub mod settings;
pub mod week_history;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to tutortrack.db in the root folder, creating file and
/// tables as needed.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize tutortrack-ri tables
///
/// Creates settings, week_history, and session_ledger if they don't
/// exist. Public so tests can set up in-memory pools.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // Settings table for config overrides
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Resolved weeks per pairing and date, consulted by later passes
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS week_history (
            coach TEXT NOT NULL,
            student TEXT NOT NULL,
            session_date TEXT NOT NULL,
            week INTEGER NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (coach, student, session_date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One row per resolved recording; re-resolution replaces the row
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session_ledger (
            id TEXT PRIMARY KEY,
            recording_key TEXT NOT NULL UNIQUE,
            secondary_id TEXT,
            standardized_name TEXT,
            name_confidence REAL,
            week INTEGER NOT NULL,
            week_confidence REAL NOT NULL,
            week_method TEXT NOT NULL,
            participants TEXT NOT NULL DEFAULT '[]',
            recorded_at TEXT,
            duration_secs INTEGER,
            source TEXT NOT NULL,
            processed_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (settings, week_history, session_ledger)");

    Ok(())
}
