//! Relative-position inference from sibling sessions
//!
//! When nothing about a recording itself names a week, its place among
//! the other sessions of the same coach/student pairing still does.
//! Siblings are date-ordered; ones with an already-known week become
//! anchors. Bracketed by two anchors the query interpolates, next to a
//! single anchor it extrapolates at one week per session step, and with
//! no anchors at all its ordinal position is the week guess.

use chrono::NaiveDateTime;

use crate::inference::context::InferenceContext;
use crate::types::{
    EvidenceError, InferenceMethod, Recording, WeekCandidate, WeekTier, MAX_PROGRAM_WEEK,
};

/// Week from position among date-ordered sibling sessions
pub struct RelativeTier;

struct Slot {
    timestamp: Option<NaiveDateTime>,
    key: String,
    week: Option<u8>,
    is_query: bool,
}

impl WeekTier for RelativeTier {
    fn name(&self) -> &'static str {
        "relative"
    }

    fn base_confidence(&self) -> f32 {
        90.0
    }

    fn attempt(
        &self,
        recording: &Recording,
        ctx: &InferenceContext,
    ) -> Result<Option<WeekCandidate>, EvidenceError> {
        if ctx.siblings.is_empty() {
            return Ok(None);
        }

        let query_key = recording.key();
        let mut slots: Vec<Slot> = ctx
            .siblings
            .iter()
            .map(|s| Slot {
                timestamp: s.timestamp,
                key: s.key.clone(),
                week: s.week,
                is_query: s.key == query_key,
            })
            .collect();

        // The query's own entry never anchors; when the caller did not
        // list it among the siblings, insert it where its timestamp falls
        if !slots.iter().any(|s| s.is_query) {
            slots.push(Slot {
                timestamp: recording.timestamp,
                key: query_key,
                week: None,
                is_query: true,
            });
        }

        // Untimestamped entries order first, then by key for determinism
        slots.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.key.cmp(&b.key))
        });

        let position = slots
            .iter()
            .position(|s| s.is_query)
            .ok_or_else(|| EvidenceError::Internal("query slot lost during ordering".to_string()))?;

        let anchors: Vec<(usize, u8)> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_query)
            .filter_map(|(i, s)| s.week.map(|w| (i, w)))
            .collect();

        let before = anchors.iter().rev().find(|(i, _)| *i < position).copied();
        let after = anchors.iter().find(|(i, _)| *i > position).copied();

        let candidate = match (before, after) {
            (Some((bi, bw)), Some((ai, aw))) => {
                let span = (ai - bi) as f64;
                let frac = (position - bi) as f64 / span;
                let raw = f64::from(bw) + frac * (f64::from(aw) - f64::from(bw));
                let week = raw.round().clamp(1.0, f64::from(MAX_PROGRAM_WEEK)) as u8;
                Some(WeekCandidate {
                    week,
                    confidence: f32::from(ctx.ladder.interpolation),
                    method: InferenceMethod::Interpolation,
                    evidence: vec![format!(
                        "interpolated between week {} at position {} and week {} at position {}",
                        bw, bi, aw, ai
                    )],
                })
            }
            // One session per week: each position step is one week
            (Some((bi, bw)), None) => {
                let steps = position - bi;
                let week = i64::from(bw) + steps as i64;
                if week > i64::from(MAX_PROGRAM_WEEK) {
                    None
                } else {
                    Some(WeekCandidate {
                        week: week as u8,
                        confidence: f32::from(ctx.ladder.extrapolation),
                        method: InferenceMethod::Extrapolation,
                        evidence: vec![format!(
                            "extrapolated forward from week {} at position {}, {} sessions later",
                            bw, bi, steps
                        )],
                    })
                }
            }
            (None, Some((ai, aw))) => {
                let steps = ai - position;
                // Backward walks floor at week 1
                let week = (i64::from(aw) - steps as i64).max(1) as u8;
                Some(WeekCandidate {
                    week,
                    confidence: f32::from(ctx.ladder.extrapolation),
                    method: InferenceMethod::Extrapolation,
                    evidence: vec![format!(
                        "extrapolated backward from week {} at position {}, {} sessions earlier",
                        aw, ai, steps
                    )],
                })
            }
            (None, None) => {
                let ordinal = position + 1;
                if ordinal > usize::from(MAX_PROGRAM_WEEK) {
                    None
                } else {
                    Some(WeekCandidate {
                        week: ordinal as u8,
                        confidence: f32::from(ctx.ladder.sequential_position),
                        method: InferenceMethod::SequentialFallback,
                        evidence: vec![format!(
                            "session {} of {} in date order with no week anchors",
                            ordinal,
                            slots.len()
                        )],
                    })
                }
            }
        };

        Ok(candidate)
    }
}
