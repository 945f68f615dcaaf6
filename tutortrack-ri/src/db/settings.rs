//! Settings table access
//!
//! Simple key/value store for config overrides set at runtime.

use anyhow::Result;
use sqlx::SqlitePool;

/// Read one setting, if present
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

/// Write one setting, replacing any existing value
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT (key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_get_missing_setting() {
        let pool = test_pool().await;
        assert_eq!(get_setting(&pool, "program_start").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_overwrite() {
        let pool = test_pool().await;
        set_setting(&pool, "program_start", "2025-03-03").await.unwrap();
        set_setting(&pool, "program_start", "2025-09-01").await.unwrap();

        assert_eq!(
            get_setting(&pool, "program_start").await.unwrap(),
            Some("2025-09-01".to_string())
        );
    }
}
