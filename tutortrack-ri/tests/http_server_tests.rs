//! HTTP server and routing integration tests
//!
//! Exercises the full service surface against an in-memory database:
//! health diagnostics, resolution passes including ledger and history
//! writes, and reconciliation reports.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use tutortrack_common::events::EventBus;
use tutortrack_ri::{build_router, AppState};

/// Create test app state with an in-memory database
async fn test_app_state() -> AppState {
    let db_pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
    tutortrack_ri::db::init_tables(&db_pool).await.unwrap();

    let event_bus = EventBus::new(100);
    AppState::new(db_pool, event_bus)
}

async fn post_json(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_reports_module_and_uptime() {
    let state = test_app_state().await;
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "tutortrack-ri");
    assert!(body["uptime_seconds"].as_u64().is_some());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let state = test_app_state().await;
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resolve_explicit_week_title() {
    let state = test_app_state().await;
    let body = json!({
        "recordings": [
            {"title": "Ada <> Grace | Week 7", "source": "cloud_api"}
        ]
    });

    let (status, response) = post_json(state, "/resolve", body).await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["results"][0];
    assert_eq!(result["week"], 7);
    assert_eq!(result["method"], "explicit_metadata");
    assert!(result["confidence"].as_f64().unwrap() >= 100.0);
    assert_eq!(result["standardized_name"], "Ada <> Grace");
    assert_eq!(response["methods"]["explicit_metadata"], 1);
}

#[tokio::test]
async fn test_resolve_timestamp_against_program_start() {
    let state = test_app_state().await;
    let body = json!({
        "recordings": [
            {
                "title": "Ada <> Grace",
                "timestamp": "2025-03-17T16:00:00Z",
                "source": "webhook"
            }
        ],
        "context": {"program_start": "2025-03-03"}
    });

    let (status, response) = post_json(state, "/resolve", body).await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["results"][0];
    // Day 14 of the program: days 0-6 week 1, 7-13 week 2, 14-20 week 3
    assert_eq!(result["week"], 3);
    assert_eq!(result["method"], "timestamp_arithmetic");
}

#[tokio::test]
async fn test_resolve_with_no_evidence_falls_back_to_week_one() {
    let state = test_app_state().await;
    let body = json!({
        "recordings": [
            {"title": "untitled recording", "source": "cloud_api"}
        ]
    });

    let (status, response) = post_json(state, "/resolve", body).await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["results"][0];
    assert_eq!(result["week"], 1);
    assert_eq!(result["method"], "default_fallback");
    assert!(result["confidence"].as_f64().unwrap() < 40.0);
}

#[tokio::test]
async fn test_resolve_writes_ledger_row() {
    let state = test_app_state().await;
    let pool = state.db.clone();
    let body = json!({
        "recordings": [
            {
                "primary_id": "rec-001",
                "title": "Ada <> Grace | Week 4",
                "source": "cloud_api"
            }
        ]
    });

    let (status, _) = post_json(state, "/resolve", body).await;
    assert_eq!(status, StatusCode::OK);

    let (key, week, method): (String, i64, String) = sqlx::query_as(
        "SELECT recording_key, week, week_method FROM session_ledger",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(key, "rec-001");
    assert_eq!(week, 4);
    assert_eq!(method, "explicit_metadata");
}

#[tokio::test]
async fn test_accepted_inference_feeds_week_history() {
    let state = test_app_state().await;
    let pool = state.db.clone();

    // First pass: explicit week marker, accepted into history
    let body = json!({
        "recordings": [
            {
                "title": "Ada <> Grace | Week 5",
                "timestamp": "2025-04-01T16:00:00Z",
                "source": "cloud_api"
            }
        ]
    });
    let (status, _) = post_json(state.clone(), "/resolve", body).await;
    assert_eq!(status, StatusCode::OK);

    let (student, week): (String, i64) =
        sqlx::query_as("SELECT student, week FROM week_history")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(student, "ada");
    assert_eq!(week, 5);

    // Second pass: same pairing and date but a bare title now resolves
    // through the historical lookup
    let body = json!({
        "recordings": [
            {
                "title": "Recording",
                "timestamp": "2025-04-01T18:30:00Z",
                "source": "webhook"
            }
        ],
        "context": {"coach": "Grace", "student": "Ada"}
    });
    let (status, response) = post_json(state, "/resolve", body).await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["results"][0];
    assert_eq!(result["week"], 5);
    assert_eq!(result["method"], "historical_lookup");
}

#[tokio::test]
async fn test_reconcile_buckets_and_match_rate() {
    let state = test_app_state().await;
    let body = json!({
        "queries": [
            {"primary_id": "a", "title": "Ada <> Grace | Week 1", "source": "cloud_api"},
            {"title": "completely unrelated", "source": "cloud_api"}
        ],
        "targets": [
            {"primary_id": "a", "title": "Week 1 folder copy", "source": "file_store"}
        ]
    });

    let (status, response) = post_json(state, "/reconcile", body).await;

    assert_eq!(status, StatusCode::OK);
    let report = &response["report"];
    assert_eq!(report["exact_matches"].as_array().unwrap().len(), 1);
    assert_eq!(report["not_found"].as_array().unwrap().len(), 1);
    assert_eq!(report["total"], 2);
    assert_eq!(report["match_rate"].as_f64().unwrap(), 50.0);

    let exact = &report["exact_matches"][0];
    assert_eq!(exact["status"], "exact");
    assert_eq!(exact["confidence"], 1.0);
    assert_eq!(exact["matched_key"], "a");
}

#[tokio::test]
async fn test_reconcile_empty_corpora_is_ok() {
    let state = test_app_state().await;
    let body = json!({"queries": [], "targets": []});

    let (status, response) = post_json(state, "/reconcile", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["report"]["total"], 0);
    assert_eq!(response["report"]["match_rate"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn test_resolve_rejects_malformed_body() {
    let state = test_app_state().await;
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/resolve")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"recordings\": \"not a list\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
