//! Week inference cascade
//!
//! Runs the evidence tiers for one recording and settles on a single
//! week. All primary tiers always run and the highest-confidence
//! candidate wins, with ties going to the earliest tier. Fallback
//! tiers (relative position, program default) are consulted only when
//! every primary tier came back empty. The cascade itself never fails:
//! tier errors turn into evidence lines, and a recording with no usable
//! evidence at all lands on week 1 at rock-bottom confidence.

use crate::inference::context::InferenceContext;
use crate::inference::relative::RelativeTier;
use crate::inference::tiers::{
    FolderTier, MetadataTier, PatternTier, ProgramDefaultTier, TimestampTier,
};
use crate::types::{InferenceMethod, Recording, WeekCandidate, WeekInference, WeekTier};

/// Ordered tier stack for week inference
pub struct WeekInferenceEngine {
    primary_tiers: Vec<Box<dyn WeekTier>>,
    fallback_tiers: Vec<Box<dyn WeekTier>>,
}

impl Default for WeekInferenceEngine {
    fn default() -> Self {
        Self {
            primary_tiers: vec![
                Box::new(TimestampTier),
                Box::new(MetadataTier),
                Box::new(FolderTier),
                Box::new(PatternTier),
            ],
            fallback_tiers: vec![Box::new(RelativeTier), Box::new(ProgramDefaultTier)],
        }
    }
}

impl WeekInferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a caller-chosen tier stack
    pub fn with_tiers(
        primary_tiers: Vec<Box<dyn WeekTier>>,
        fallback_tiers: Vec<Box<dyn WeekTier>>,
    ) -> Self {
        Self {
            primary_tiers,
            fallback_tiers,
        }
    }

    /// Infer the program week for one recording
    ///
    /// # Arguments
    /// * `recording` - The recording under inference
    /// * `ctx` - Program context shared across the pass
    ///
    /// # Returns
    /// Always produces an inference; the worst case is week 1 by the
    /// default fallback. Tier errors are recorded as evidence lines on
    /// whatever result wins.
    pub fn infer(&self, recording: &Recording, ctx: &InferenceContext) -> WeekInference {
        let mut errors: Vec<String> = Vec::new();

        let winner = self
            .best_of(&self.primary_tiers, recording, ctx, &mut errors)
            .or_else(|| self.best_of(&self.fallback_tiers, recording, ctx, &mut errors));

        let mut inference = match winner {
            Some(candidate) => WeekInference {
                week: candidate.week,
                confidence: candidate.confidence,
                method: candidate.method,
                evidence: candidate.evidence,
            },
            None => WeekInference {
                week: 1,
                confidence: f32::from(ctx.ladder.default_fallback),
                method: InferenceMethod::DefaultFallback,
                evidence: vec!["no week evidence found; assuming week 1".to_string()],
            },
        };
        inference.evidence.extend(errors);
        inference
    }

    /// Highest-confidence candidate across a tier list
    ///
    /// Strict comparison keeps the earliest tier on equal confidence.
    fn best_of(
        &self,
        tiers: &[Box<dyn WeekTier>],
        recording: &Recording,
        ctx: &InferenceContext,
        errors: &mut Vec<String>,
    ) -> Option<WeekCandidate> {
        let mut best: Option<WeekCandidate> = None;
        for tier in tiers {
            match tier.attempt(recording, ctx) {
                Ok(Some(candidate)) => {
                    if best
                        .as_ref()
                        .map_or(true, |b| candidate.confidence > b.confidence)
                    {
                        best = Some(candidate);
                    }
                }
                Ok(None) => {}
                Err(e) => errors.push(format!("{} tier error: {}", tier.name(), e)),
            }
        }
        best
    }
}
