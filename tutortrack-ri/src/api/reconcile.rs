//! Reconciliation API handler
//!
//! POST /reconcile matches one corpus of recordings against another.
//! The target index is built first, then queries run against the
//! finished index; the two phases never overlap.

use axum::{extract::State, routing::post, Json, Router};
use tracing::info;
use tutortrack_common::events::IngestEvent;
use uuid::Uuid;

use crate::{
    error::ApiResult,
    matching::RecordingIndex,
    models::{ReconcileRequest, ReconcileResponse},
    reconcile::build_report,
    types::Recording,
    AppState,
};

/// POST /reconcile
///
/// Match the query corpus against the target corpus and report every
/// query in exactly one bucket. Empty corpora produce an empty report,
/// never an error.
pub async fn reconcile_recordings(
    State(state): State<AppState>,
    Json(request): Json<ReconcileRequest>,
) -> ApiResult<Json<ReconcileResponse>> {
    let started = std::time::Instant::now();
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    let queries: Vec<Recording> = request
        .queries
        .into_iter()
        .map(|dto| dto.into_recording())
        .collect();
    let targets: Vec<Recording> = request
        .targets
        .into_iter()
        .map(|dto| dto.into_recording())
        .collect();

    info!(
        session_id = %session_id,
        queries = queries.len(),
        targets = targets.len(),
        "Reconciliation pass started"
    );

    // Index construction strictly precedes matching
    let index = RecordingIndex::build(targets);
    let report = build_report(&queries, &index);

    let duration_ms = started.elapsed().as_millis() as u64;
    info!(
        session_id = %session_id,
        summary = %report.summary(),
        duration_ms,
        "Reconciliation pass completed"
    );
    state.event_bus.emit_lossy(IngestEvent::ReconcileCompleted {
        session_id,
        exact_matches: report.exact_matches.len(),
        fuzzy_matches: report.fuzzy_matches.len(),
        possible_matches: report.possible_matches.len(),
        not_found: report.not_found.len(),
        match_rate: report.match_rate,
        timestamp: tutortrack_common::time::now(),
    });

    Ok(Json(ReconcileResponse {
        session_id,
        report,
        duration_ms,
    }))
}

/// Build reconciliation routes
pub fn reconcile_routes() -> Router<AppState> {
    Router::new().route("/reconcile", post(reconcile_recordings))
}
