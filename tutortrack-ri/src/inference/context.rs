//! Shared context for week inference
//!
//! A single [`InferenceContext`] is built per resolution request and
//! passed read-only to every tier. Tiers take what they need from it:
//! the timestamp tier wants the program start and the history lookup,
//! the relative tier wants the sibling list, the default tier wants the
//! configured program default.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::WeekLookup;

/// Another recording from the same coach/student pairing
///
/// Siblings anchor the relative tier: ones with a known week become
/// interpolation/extrapolation anchors, ones without contribute only
/// their position in the sorted sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SiblingSession {
    /// Stable key of the sibling recording
    pub key: String,
    /// Recording timestamp, if known
    pub timestamp: Option<NaiveDateTime>,
    /// Already-resolved week number, if any
    pub week: Option<u8>,
}

/// Confidence scores assigned by each inference method
///
/// The ordering across fields is the contract: explicit metadata beats
/// timestamp arithmetic, every anchored method beats the sequential
/// guess, and all pattern fallbacks stay below the program default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceLadder {
    /// Confidence for the highest-priority explicit week marker
    pub explicit_metadata_max: u8,
    /// Confidence lost per metadata pattern priority step
    pub metadata_priority_step: u8,
    /// Week computed from timestamp and program start
    pub timestamp_arithmetic: u8,
    /// Week found in the recorded history for this pairing and date
    pub historical_lookup: u8,
    /// Week interpolated between two sibling anchors
    pub interpolation: u8,
    /// Week extrapolated from a single sibling anchor
    pub extrapolation: u8,
    /// Week marker found in the containing folder name
    pub folder_name: u8,
    /// Sequential position among unanchored siblings
    pub sequential_position: u8,
    /// Configured program default week
    pub program_default: u8,
    /// Base confidence for the weakest fallback pattern
    pub pattern_fallback_base: u8,
    /// Confidence gained per fallback pattern priority step
    pub pattern_priority_step: u8,
    /// Absolute last resort (week 1)
    pub default_fallback: u8,
}

impl Default for ConfidenceLadder {
    fn default() -> Self {
        Self {
            explicit_metadata_max: 110,
            metadata_priority_step: 5,
            timestamp_arithmetic: 100,
            historical_lookup: 100,
            interpolation: 90,
            extrapolation: 85,
            folder_name: 80,
            sequential_position: 75,
            program_default: 70,
            pattern_fallback_base: 40,
            pattern_priority_step: 5,
            default_fallback: 10,
        }
    }
}

impl ConfidenceLadder {
    /// Confidence for an explicit metadata marker at the given pattern
    /// priority (1 = most specific)
    pub fn metadata_confidence(&self, priority: u8) -> u8 {
        self.explicit_metadata_max
            .saturating_sub(self.metadata_priority_step * priority.saturating_sub(1))
    }

    /// Confidence for a fallback pattern hit at the given priority
    ///
    /// Grows toward more specific patterns but never reaches
    /// `program_default`.
    pub fn pattern_confidence(&self, priority: u8) -> u8 {
        self.pattern_fallback_base
            .saturating_add(self.pattern_priority_step * 6u8.saturating_sub(priority))
    }

    /// Check the cross-field ordering contract
    pub fn validate(&self) -> bool {
        self.explicit_metadata_max >= self.timestamp_arithmetic
            && self.timestamp_arithmetic >= self.interpolation
            && self.interpolation >= self.extrapolation
            && self.extrapolation >= self.folder_name
            && self.folder_name >= self.sequential_position
            && self.sequential_position >= self.program_default
            && self.pattern_confidence(1) < self.program_default
            && self.default_fallback < self.pattern_fallback_base
    }
}

/// Read-only inputs shared by every inference tier
#[derive(Clone)]
pub struct InferenceContext<'a> {
    /// First day of program week 1, if configured
    pub program_start: Option<NaiveDate>,
    /// Coach name for history lookups
    pub coach: Option<String>,
    /// Student name for history lookups
    pub student: Option<String>,
    /// Configured default week for this program, if any
    pub default_week: Option<u8>,
    /// Historical (pairing, date) -> week source
    pub week_lookup: Option<&'a dyn WeekLookup>,
    /// Other recordings from the same pairing
    pub siblings: &'a [SiblingSession],
    /// Confidence assignment
    pub ladder: ConfidenceLadder,
}

impl InferenceContext<'static> {
    /// Context with nothing known; only metadata and pattern tiers can
    /// produce candidates against it
    pub fn empty() -> Self {
        Self {
            program_start: None,
            coach: None,
            student: None,
            default_week: None,
            week_lookup: None,
            siblings: &[],
            ladder: ConfidenceLadder::default(),
        }
    }
}

impl std::fmt::Debug for InferenceContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceContext")
            .field("program_start", &self.program_start)
            .field("coach", &self.coach)
            .field("student", &self.student)
            .field("default_week", &self.default_week)
            .field("week_lookup", &self.week_lookup.map(|_| "dyn WeekLookup"))
            .field("siblings", &self.siblings.len())
            .field("ladder", &self.ladder)
            .finish()
    }
}
