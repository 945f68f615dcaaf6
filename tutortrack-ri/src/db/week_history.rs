//! Week history persistence
//!
//! Stores resolved (coach, student, date) -> week assignments and loads
//! them back as an in-memory snapshot before a resolution pass. Names
//! are normalized on write so lookups are case-insensitive.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::inference::MemoryWeekHistory;

/// Record one resolved week, replacing any earlier assignment
pub async fn record_week(
    pool: &SqlitePool,
    coach: &str,
    student: &str,
    date: NaiveDate,
    week: u8,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO week_history (coach, student, session_date, week, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (coach, student, session_date)
        DO UPDATE SET week = excluded.week, updated_at = excluded.updated_at
        "#,
    )
    .bind(coach.trim().to_lowercase())
    .bind(student.trim().to_lowercase())
    .bind(date.format("%Y-%m-%d").to_string())
    .bind(i64::from(week))
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the whole history table into memory for a resolution pass
///
/// Malformed rows are skipped with a warning rather than failing the
/// pass.
pub async fn load_snapshot(pool: &SqlitePool) -> Result<MemoryWeekHistory> {
    let rows: Vec<(String, String, String, i64)> =
        sqlx::query_as("SELECT coach, student, session_date, week FROM week_history")
            .fetch_all(pool)
            .await?;

    let mut history = MemoryWeekHistory::new();
    for (coach, student, date_str, week) in rows {
        let date = match NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(date = %date_str, error = %e, "Skipping malformed history row");
                continue;
            }
        };
        let week = match u8::try_from(week) {
            Ok(w) => w,
            Err(_) => {
                tracing::warn!(week, "Skipping history row with out-of-range week");
                continue;
            }
        };
        history.record(&coach, &student, date, week);
    }

    tracing::debug!("Loaded {} week history entries", history.len());
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeekLookup;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_record_and_snapshot_round_trip() {
        let pool = test_pool().await;
        record_week(&pool, "Grace Hopper", "Ada Lovelace", date(2025, 3, 4), 5)
            .await
            .unwrap();

        let history = load_snapshot(&pool).await.unwrap();
        assert_eq!(
            history.lookup("grace hopper", "ADA LOVELACE", date(2025, 3, 4)),
            Some(5)
        );
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_week() {
        let pool = test_pool().await;
        record_week(&pool, "Grace", "Ada", date(2025, 3, 4), 5)
            .await
            .unwrap();
        record_week(&pool, "Grace", "Ada", date(2025, 3, 4), 6)
            .await
            .unwrap();

        let history = load_snapshot(&pool).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.lookup("Grace", "Ada", date(2025, 3, 4)), Some(6));
    }

    #[tokio::test]
    async fn test_empty_table_gives_empty_snapshot() {
        let pool = test_pool().await;
        let history = load_snapshot(&pool).await.unwrap();
        assert!(history.is_empty());
    }
}
