//! Primary and fallback inference tiers
//!
//! Each tier is one evidence strategy behind the [`WeekTier`] trait.
//! Tiers never look at each other's output; the cascade runs them all
//! and keeps the highest-confidence candidate. The relative-position
//! tier lives in its own module.

use crate::extractors::week_patterns::{
    bare_number_patterns, folder_patterns, metadata_patterns, scan_week,
};
use crate::inference::context::InferenceContext;
use crate::types::{
    EvidenceError, InferenceMethod, Recording, SourceTag, WeekCandidate, WeekTier,
    MAX_PROGRAM_WEEK,
};

// ============================================================================
// Timestamp Tier
// ============================================================================

/// Week from timestamp arithmetic, with historical lookup as a stand-in
///
/// When the program start date is configured, the week is the number of
/// whole 7-day periods since it plus one. Without a usable start date the
/// tier falls back to the recorded history for this pairing and date.
/// Both paths score at the top of the anchored range; arithmetic is
/// checked first, so it wins when both would answer.
pub struct TimestampTier;

impl WeekTier for TimestampTier {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn base_confidence(&self) -> f32 {
        100.0
    }

    fn attempt(
        &self,
        recording: &Recording,
        ctx: &InferenceContext,
    ) -> Result<Option<WeekCandidate>, EvidenceError> {
        let Some(ts) = recording.timestamp else {
            return Ok(None);
        };

        if let Some(start) = ctx.program_start {
            let days = (ts.date() - start).num_days();
            if days >= 0 {
                let week = days / 7 + 1;
                if (1..=i64::from(MAX_PROGRAM_WEEK)).contains(&week) {
                    return Ok(Some(WeekCandidate {
                        week: week as u8,
                        confidence: f32::from(ctx.ladder.timestamp_arithmetic),
                        method: InferenceMethod::TimestampArithmetic,
                        evidence: vec![format!(
                            "timestamp {} is {} days after program start {}",
                            ts, days, start
                        )],
                    }));
                }
            }
        }

        if let (Some(lookup), Some(coach), Some(student)) =
            (ctx.week_lookup, ctx.coach.as_deref(), ctx.student.as_deref())
        {
            if let Some(week) = lookup.lookup(coach, student, ts.date()) {
                return Ok(Some(WeekCandidate {
                    week,
                    confidence: f32::from(ctx.ladder.historical_lookup),
                    method: InferenceMethod::HistoricalLookup,
                    evidence: vec![format!(
                        "history records week {} for {} / {} on {}",
                        week,
                        student,
                        coach,
                        ts.date()
                    )],
                }));
            }
        }

        Ok(None)
    }
}

// ============================================================================
// Metadata Tier
// ============================================================================

/// Explicit week markers in the title and description
pub struct MetadataTier;

impl WeekTier for MetadataTier {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn base_confidence(&self) -> f32 {
        110.0
    }

    fn attempt(
        &self,
        recording: &Recording,
        ctx: &InferenceContext,
    ) -> Result<Option<WeekCandidate>, EvidenceError> {
        let mut text = recording.title.clone();
        if let Some(desc) = &recording.description {
            text.push(' ');
            text.push_str(desc);
        }

        Ok(scan_week(&text, metadata_patterns()).map(|hit| WeekCandidate {
            week: hit.week,
            confidence: f32::from(ctx.ladder.metadata_confidence(hit.priority)),
            method: InferenceMethod::ExplicitMetadata,
            evidence: vec![format!(
                "title/description marker '{}' names week {}",
                hit.pattern, hit.week
            )],
        }))
    }
}

// ============================================================================
// Folder Tier
// ============================================================================

/// Week marker in the containing folder name
///
/// Only file-store recordings carry folder context. All folder markers
/// score the same: folder names are organizational, not per-pattern
/// statements of intent.
pub struct FolderTier;

impl WeekTier for FolderTier {
    fn name(&self) -> &'static str {
        "folder"
    }

    fn base_confidence(&self) -> f32 {
        80.0
    }

    fn attempt(
        &self,
        recording: &Recording,
        ctx: &InferenceContext,
    ) -> Result<Option<WeekCandidate>, EvidenceError> {
        if recording.source != SourceTag::FileStore {
            return Ok(None);
        }
        let Some(folder) = recording.folder_name() else {
            return Ok(None);
        };

        Ok(scan_week(folder, folder_patterns()).map(|hit| WeekCandidate {
            week: hit.week,
            confidence: f32::from(ctx.ladder.folder_name),
            method: InferenceMethod::FolderName,
            evidence: vec![format!(
                "folder '{}' marker '{}' names week {}",
                folder, hit.pattern, hit.week
            )],
        }))
    }
}

// ============================================================================
// Pattern Tier
// ============================================================================

/// Low-confidence scan over every text field at once
///
/// Catches markers the stricter tiers miss: folder-style markers inside
/// titles, markers in path segments of non-file sources, and finally
/// bare numbers. Tables run in specificity order and the bare-number
/// table only when everything else missed.
pub struct PatternTier;

impl WeekTier for PatternTier {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn base_confidence(&self) -> f32 {
        65.0
    }

    fn attempt(
        &self,
        recording: &Recording,
        ctx: &InferenceContext,
    ) -> Result<Option<WeekCandidate>, EvidenceError> {
        let mut text = recording.title.clone();
        if let Some(desc) = &recording.description {
            text.push(' ');
            text.push_str(desc);
        }
        for segment in &recording.context_path {
            text.push(' ');
            text.push_str(segment);
        }

        let hit = scan_week(&text, metadata_patterns())
            .or_else(|| scan_week(&text, folder_patterns()))
            .or_else(|| scan_week(&text, bare_number_patterns()));

        Ok(hit.map(|hit| WeekCandidate {
            week: hit.week,
            confidence: f32::from(ctx.ladder.pattern_confidence(hit.priority)),
            method: InferenceMethod::PatternFallback,
            evidence: vec![format!(
                "loose marker '{}' suggests week {}",
                hit.pattern, hit.week
            )],
        }))
    }
}

// ============================================================================
// Program Default Tier
// ============================================================================

/// Configured default week for the program type
pub struct ProgramDefaultTier;

impl WeekTier for ProgramDefaultTier {
    fn name(&self) -> &'static str {
        "program_default"
    }

    fn base_confidence(&self) -> f32 {
        70.0
    }

    fn attempt(
        &self,
        _recording: &Recording,
        ctx: &InferenceContext,
    ) -> Result<Option<WeekCandidate>, EvidenceError> {
        let Some(week) = ctx.default_week else {
            return Ok(None);
        };
        if !(1..=MAX_PROGRAM_WEEK).contains(&week) {
            return Ok(None);
        }

        Ok(Some(WeekCandidate {
            week,
            confidence: f32::from(ctx.ladder.program_default),
            method: InferenceMethod::ProgramDefault,
            evidence: vec![format!("program default week {}", week)],
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================
