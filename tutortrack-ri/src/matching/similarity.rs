//! Similarity scoring between recordings
//!
//! All thresholds and weights for the match cascade live here so the
//! scoring contract is visible in one place. Scores are `f32` in 0.0-1.0.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::types::Recording;

/// Timestamps this close count as the same session occurrence
pub const DATE_TOLERANCE_HOURS: i64 = 24;
/// Minimum participant overlap for a date-based match
pub const OVERLAP_THRESHOLD: f32 = 0.5;
/// Composite scores below this are not worth listing as candidates
pub const CANDIDATE_FLOOR: f32 = 0.6;
/// Composite score at which a candidate is accepted outright
pub const HIGH_CONFIDENCE: f32 = 0.8;
/// Floor for shared-room candidates that failed the date check
pub const SECONDARY_RETAINED_SCORE: f32 = 0.7;

/// Composite weight of calendar-date agreement
pub const DATE_WEIGHT: f32 = 0.4;
/// Composite weight of participant overlap
pub const OVERLAP_WEIGHT: f32 = 0.4;
/// Composite weight of secondary-id agreement
pub const SECONDARY_WEIGHT: f32 = 0.2;

/// Fraction of shared participants between two recordings
///
/// Display names compare case-insensitively with surrounding whitespace
/// ignored. The denominator is the larger list as reported, duplicates
/// included, so a source that repeats a name dilutes its own ratio.
/// Either side empty scores 0.0.
pub fn participant_overlap(a: &[String], b: &[String]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<String> = a.iter().map(|name| normalize(name)).collect();
    let set_b: HashSet<String> = b.iter().map(|name| normalize(name)).collect();
    let shared = set_a.intersection(&set_b).count();

    shared as f32 / a.len().max(b.len()) as f32
}

/// Are two timestamps close enough to be the same occurrence?
///
/// Compares elapsed seconds, not calendar dates, so a 23:00 session and
/// its 01:00 re-upload still agree. Exactly 24h is in; one second past
/// is out.
pub fn within_date_tolerance(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    (a - b).num_seconds().abs() <= DATE_TOLERANCE_HOURS * 3600
}

/// Weighted composite similarity between a query and a target
///
/// Calendar-date and secondary-id agreement contribute their full weight
/// or nothing; participant overlap contributes proportionally.
pub fn composite_score(query: &Recording, target: &Recording) -> f32 {
    let date_part = match (query.date(), target.date()) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => 0.0,
    };

    let secondary_part = match (&query.secondary_id, &target.secondary_id) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => 0.0,
    };

    let overlap = participant_overlap(&query.participants, &target.participants);

    DATE_WEIGHT * date_part + OVERLAP_WEIGHT * overlap + SECONDARY_WEIGHT * secondary_part
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
