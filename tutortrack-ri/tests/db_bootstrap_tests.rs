//! Database bootstrap tests
//!
//! Verifies file-backed pool initialization: missing directories and
//! database files are created, tables exist afterward, and reopening
//! an existing database preserves its contents.

use tutortrack_ri::db;

#[tokio::test]
async fn test_init_creates_file_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("tutortrack.db");

    let pool = db::init_database_pool(&db_path).await.unwrap();
    assert!(db_path.exists());

    // All three tables answer queries
    for table in ["settings", "week_history", "session_ledger"] {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{} should start empty", table);
    }
}

#[tokio::test]
async fn test_reopen_preserves_contents() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tutortrack.db");

    let pool = db::init_database_pool(&db_path).await.unwrap();
    db::settings::set_setting(&pool, "program_start", "2025-03-03")
        .await
        .unwrap();
    pool.close().await;

    let pool = db::init_database_pool(&db_path).await.unwrap();
    let value = db::settings::get_setting(&pool, "program_start")
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("2025-03-03"));
}
