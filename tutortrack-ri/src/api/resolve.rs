//! Resolution API handlers
//!
//! POST /resolve runs the week-inference cascade over a batch of
//! recordings, writes ledger rows, and feeds accepted inferences back
//! into the week history so later passes hit the historical lookup
//! tier. Engine work is pure and synchronous; all I/O happens here,
//! before and after the pass.

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use tracing::{debug, error, info};
use tutortrack_common::events::IngestEvent;
use uuid::Uuid;

use crate::{
    config,
    db,
    error::ApiResult,
    extractors::names::{canonicalize_name, name_pair_for, NamePair},
    inference::{ConfidenceLadder, InferenceContext, MethodTally, SiblingSession,
        WeekInferenceEngine},
    models::{LedgerEntry, ResolveRequest, ResolveResponse, ResolvedRecording},
    types::Recording,
    AppState,
};

/// POST /resolve
///
/// Resolve a batch of recordings to program weeks. Context gaps
/// (program start, default week) are filled from the settings table
/// before the pass. Accepted inferences are recorded in the week
/// history; every recording lands in the session ledger.
pub async fn resolve_recordings(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> ApiResult<Json<ResolveResponse>> {
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    info!(
        session_id = %session_id,
        recordings = request.recordings.len(),
        "Resolution pass started"
    );
    state.event_bus.emit_lossy(IngestEvent::ResolveStarted {
        session_id,
        recording_count: request.recordings.len(),
        timestamp: tutortrack_common::time::now(),
    });

    let mut processed = 0usize;
    match run_resolve(&state, session_id, request, &mut processed).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            let message = err.to_string();
            error!(session_id = %session_id, error = %message, "Resolution pass failed");
            *state.last_error.write().await = Some(message.clone());
            state.event_bus.emit_lossy(IngestEvent::ResolveFailed {
                session_id,
                error_message: message,
                recordings_processed: processed,
                timestamp: tutortrack_common::time::now(),
            });
            Err(err)
        }
    }
}

/// The resolution pass proper; errors bubble to the handler for
/// failure reporting
async fn run_resolve(
    state: &AppState,
    session_id: Uuid,
    request: ResolveRequest,
    processed: &mut usize,
) -> ApiResult<ResolveResponse> {
    let started = std::time::Instant::now();

    // Fill context gaps from configuration
    let settings = config::load_program_settings(&state.db).await?;
    let program_start = request.context.program_start.or(settings.program_start);
    let default_week = request.context.default_week.or(settings.default_week);

    // Snapshot the week history before the pass; the engine reads only
    // the snapshot, never the live table
    let history = db::week_history::load_snapshot(&state.db).await?;

    let siblings: Vec<SiblingSession> = request
        .context
        .siblings
        .into_iter()
        .map(|dto| dto.into_sibling())
        .collect();

    let ctx = InferenceContext {
        program_start,
        coach: request.context.coach.clone(),
        student: request.context.student.clone(),
        default_week,
        week_lookup: Some(&history),
        siblings: &siblings,
        ladder: ConfidenceLadder::default(),
    };
    let roster = request.context.roster;

    let engine = WeekInferenceEngine::new();
    let mut tally = MethodTally::new();
    let mut results = Vec::with_capacity(request.recordings.len());
    let mut accepted: Vec<(String, String, chrono::NaiveDate, u8)> = Vec::new();

    for dto in request.recordings {
        let recording = dto.into_recording();
        let inference = engine.infer(&recording, &ctx);
        tally.record(inference.method);

        let name_pair = resolved_name_pair(&recording, &roster, &ctx);

        debug!(
            key = %recording.key(),
            week = inference.week,
            confidence = inference.confidence,
            method = inference.method.as_str(),
            "Recording resolved"
        );
        state.event_bus.emit_lossy(IngestEvent::WeekInferred {
            session_id,
            recording_key: recording.key(),
            week: inference.week,
            confidence: inference.confidence,
            method: inference.method.as_str().to_string(),
            timestamp: tutortrack_common::time::now(),
        });

        let entry = LedgerEntry::from_resolution(&recording, &inference, name_pair.as_ref());
        if let Err(err) = db::ledger::upsert_entry(&state.db, &entry).await {
            state.event_bus.emit_lossy(IngestEvent::DatabaseError {
                operation: "session_ledger upsert".to_string(),
                error: err.to_string(),
                timestamp: tutortrack_common::time::now(),
            });
            return Err(err.into());
        }
        *processed += 1;

        // An inference is worth remembering once it is at least as good
        // as anchored relative positioning; weaker guesses would poison
        // later passes through the historical-lookup tier
        if inference.confidence >= f32::from(ctx.ladder.interpolation) {
            if let (Some(pair), Some(date)) = (&name_pair, recording.date()) {
                accepted.push((pair.coach.clone(), pair.student.clone(), date, inference.week));
            }
        }

        results.push(ResolvedRecording {
            recording_key: recording.key(),
            week: inference.week,
            confidence: inference.confidence,
            method: inference.method,
            evidence: inference.evidence,
            standardized_name: name_pair.as_ref().map(NamePair::standardized),
            name_confidence: name_pair.as_ref().map(|p| p.confidence),
        });
    }

    // Write history after the pass so the snapshot stays stable
    for (coach, student, date, week) in accepted {
        db::week_history::record_week(&state.db, &coach, &student, date, week).await?;
    }

    let duration_ms = started.elapsed().as_millis() as u64;
    info!(
        session_id = %session_id,
        recordings = results.len(),
        duration_ms,
        methods = %tally.display_string(),
        "Resolution pass completed"
    );
    state.event_bus.emit_lossy(IngestEvent::ResolveCompleted {
        session_id,
        recordings_processed: results.len(),
        duration_ms,
        timestamp: tutortrack_common::time::now(),
    });

    Ok(ResolveResponse {
        session_id,
        results,
        methods: tally,
        duration_ms,
    })
}

/// Name pair for a recording, snapped to the roster when close enough
///
/// The context's coach/student names fill in when the title carries no
/// pair at all. A roster snap raises the pair confidence to the match
/// similarity when that is higher than the extraction confidence.
fn resolved_name_pair(
    recording: &Recording,
    roster: &[String],
    ctx: &InferenceContext,
) -> Option<NamePair> {
    let mut pair = name_pair_for(recording).or_else(|| {
        match (&ctx.student, &ctx.coach) {
            (Some(student), Some(coach)) => Some(NamePair {
                student: crate::extractors::names::standardize_name(student),
                coach: crate::extractors::names::standardize_name(coach),
                confidence: 0.6,
                pattern: "request_context",
            }),
            _ => None,
        }
    })?;

    if !roster.is_empty() {
        let mut snapped: Option<f32> = None;
        for name in [&mut pair.student, &mut pair.coach] {
            if let Some((canonical, similarity)) = canonicalize_name(name, roster) {
                *name = canonical;
                snapped = Some(snapped.map_or(similarity, |s: f32| s.min(similarity)));
            }
        }
        if let Some(similarity) = snapped {
            pair.confidence = pair.confidence.max(similarity);
        }
    }

    Some(pair)
}

/// Build resolution routes
pub fn resolve_routes() -> Router<AppState> {
    Router::new().route("/resolve", post(resolve_recordings))
}
