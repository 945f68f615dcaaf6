//! Session ledger persistence

use anyhow::Result;
use sqlx::SqlitePool;

use crate::models::LedgerEntry;

/// Write one ledger row, replacing any earlier row for the same recording
pub async fn upsert_entry(pool: &SqlitePool, entry: &LedgerEntry) -> Result<()> {
    let participants = serde_json::to_string(&entry.participants)?;

    sqlx::query(
        r#"
        INSERT INTO session_ledger (
            id, recording_key, secondary_id, standardized_name, name_confidence,
            week, week_confidence, week_method, participants, recorded_at,
            duration_secs, source, processed_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (recording_key) DO UPDATE SET
            standardized_name = excluded.standardized_name,
            name_confidence = excluded.name_confidence,
            week = excluded.week,
            week_confidence = excluded.week_confidence,
            week_method = excluded.week_method,
            participants = excluded.participants,
            recorded_at = excluded.recorded_at,
            duration_secs = excluded.duration_secs,
            source = excluded.source,
            processed_at = excluded.processed_at
        "#,
    )
    .bind(entry.id.to_string())
    .bind(&entry.recording_key)
    .bind(&entry.secondary_id)
    .bind(&entry.standardized_name)
    .bind(entry.name_confidence.map(f64::from))
    .bind(i64::from(entry.week))
    .bind(f64::from(entry.week_confidence))
    .bind(&entry.week_method)
    .bind(participants)
    .bind(
        entry
            .recorded_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()),
    )
    .bind(entry.duration_secs.map(i64::from))
    .bind(&entry.source)
    .bind(entry.processed_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}
