//! Identity match cascade
//!
//! Matches one query recording against the prebuilt target index in four
//! steps, most reliable first:
//!
//! 1. Exact primary-id equality
//! 2. Shared secondary id with timestamps within tolerance
//! 3. Same calendar date with strong participant overlap
//! 4. Weighted composite scan over the whole corpus
//!
//! Steps 1-3 return as soon as they find something. Step 4 classifies by
//! score: accept outright at the high bar, otherwise hand back ranked
//! candidates for human review. Shared-room targets that failed the date
//! check in step 2 re-enter the scan with a floored score, so a rescheduled
//! recurring session still surfaces as a review candidate.

use std::collections::HashSet;

use crate::matching::index::RecordingIndex;
use crate::matching::similarity::{
    composite_score, participant_overlap, within_date_tolerance, CANDIDATE_FLOOR, HIGH_CONFIDENCE,
    OVERLAP_THRESHOLD, SECONDARY_RETAINED_SCORE,
};
use crate::types::{MatchCandidate, MatchMethod, MatchOutcome, MatchStatus, Recording};

/// Confidence assigned to a secondary-id + date match
const SECONDARY_DATE_CONFIDENCE: f32 = 0.9;
/// Date + participant matches scale with the observed overlap
const DATE_PARTICIPANT_SCALE: f32 = 0.8;
/// Review candidates listed on a fuzzy-low outcome
const MAX_REVIEW_CANDIDATES: usize = 3;

/// Match one query recording against the target index
pub fn match_recording(query: &Recording, index: &RecordingIndex) -> MatchOutcome {
    // Step 1: source-assigned ids are authoritative
    if let Some(id) = &query.primary_id {
        if let Some(&i) = index.by_primary(id).first() {
            return MatchOutcome {
                status: MatchStatus::Exact,
                confidence: 1.0,
                matched: Some(i),
                method: Some(MatchMethod::PrimaryId),
                candidates: Vec::new(),
            };
        }
    }

    // Step 2: same recurring room, same occurrence
    let mut shared_room_misses: HashSet<usize> = HashSet::new();
    if let Some(sid) = &query.secondary_id {
        for &i in index.by_secondary(sid) {
            let target = &index.records()[i];
            match (query.timestamp, target.timestamp) {
                (Some(a), Some(b)) if within_date_tolerance(a, b) => {
                    return MatchOutcome {
                        status: MatchStatus::FuzzyHigh,
                        confidence: SECONDARY_DATE_CONFIDENCE,
                        matched: Some(i),
                        method: Some(MatchMethod::SecondaryIdDate),
                        candidates: Vec::new(),
                    };
                }
                _ => {
                    // Same room, wrong occurrence: stays in the running
                    shared_room_misses.insert(i);
                }
            }
        }
    }

    // Step 3: same day, mostly the same people
    if let Some(date) = query.date() {
        let mut best: Option<(usize, f32)> = None;
        for &i in index.by_date(date) {
            let overlap =
                participant_overlap(&query.participants, &index.records()[i].participants);
            // Strict comparison: ties keep the earliest corpus entry
            if best.map_or(true, |(_, b)| overlap > b) {
                best = Some((i, overlap));
            }
        }
        if let Some((i, overlap)) = best {
            if overlap > OVERLAP_THRESHOLD {
                return MatchOutcome {
                    status: MatchStatus::FuzzyHigh,
                    confidence: DATE_PARTICIPANT_SCALE * overlap,
                    matched: Some(i),
                    method: Some(MatchMethod::DateParticipants),
                    candidates: Vec::new(),
                };
            }
        }
    }

    // Step 4: weighted scan over everything
    let scored: Vec<MatchCandidate> = index
        .records()
        .iter()
        .enumerate()
        .map(|(i, target)| {
            let mut score = composite_score(query, target);
            if shared_room_misses.contains(&i) {
                score = score.max(SECONDARY_RETAINED_SCORE);
            }
            MatchCandidate {
                target_index: i,
                key: target.key(),
                score,
            }
        })
        .collect();

    let best_score = scored.iter().map(|c| c.score).fold(0.0f32, f32::max);

    let mut candidates: Vec<MatchCandidate> = scored
        .into_iter()
        .filter(|c| c.score >= CANDIDATE_FLOOR)
        .collect();
    // Stable sort: equal scores keep corpus order
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    match candidates.first() {
        Some(best) if best.score >= HIGH_CONFIDENCE => MatchOutcome {
            status: MatchStatus::FuzzyHigh,
            confidence: best.score,
            matched: Some(best.target_index),
            method: Some(MatchMethod::WeightedSimilarity),
            candidates: Vec::new(),
        },
        Some(best) => MatchOutcome {
            status: MatchStatus::FuzzyLow,
            confidence: best.score,
            matched: None,
            method: Some(MatchMethod::WeightedSimilarity),
            candidates: {
                candidates.truncate(MAX_REVIEW_CANDIDATES);
                candidates
            },
        },
        None => MatchOutcome::unmatched(best_score),
    }
}
