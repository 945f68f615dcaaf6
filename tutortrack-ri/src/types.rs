//! Core Types and Trait Definitions for TUTORTRACK-RI
//!
//! Defines the base types and traits for the resolution pipeline:
//! - **Phase 1:** Evidence extraction (pattern tables over titles, folders, dates)
//! - **Phase 2:** Week inference (ordered strategy tiers behind `WeekTier`)
//! - **Phase 3:** Identity matching (exact-then-fuzzy cascade over prebuilt indexes)
//! - **Phase 4:** Reconciliation reporting
//!
//! # Architecture
//! The pipeline is pure and synchronous: every phase is a function of its
//! inputs, statistics are returned values, and all I/O (database lookups,
//! event emission) happens at the service boundary before or after a pass.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::inference::InferenceContext;

/// Largest week number any program can reach
pub const MAX_PROGRAM_WEEK: u8 = 52;

// ============================================================================
// Recordings
// ============================================================================

/// Origin of an observed recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Polled from a cloud recording API
    CloudApi,
    /// Delivered by a webhook payload
    Webhook,
    /// Discovered in a mirrored file-store tree
    FileStore,
}

impl SourceTag {
    /// Source name as stored in the ledger
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::CloudApi => "cloud_api",
            SourceTag::Webhook => "webhook",
            SourceTag::FileStore => "file_store",
        }
    }
}

/// One observed recording, as delivered by any source
///
/// Fields are optional wherever sources disagree or omit data. Timestamps
/// are timezone-naive: sources report wall-clock times in inconsistent
/// zones, and week arithmetic only needs calendar distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Source-assigned unique id (cloud recording UUID), if any
    pub primary_id: Option<String>,
    /// Meeting/room identifier shared across recurring sessions
    pub secondary_id: Option<String>,
    /// Free-form title as entered by the coach or generated by the source
    pub title: String,
    /// Free-form description, when the source provides one
    #[serde(default)]
    pub description: Option<String>,
    /// Recording start time (wall clock, zone-naive)
    pub timestamp: Option<NaiveDateTime>,
    /// Recording length in seconds
    pub duration_secs: Option<u32>,
    /// Participant display names as reported by the source
    #[serde(default)]
    pub participants: Vec<String>,
    /// Folder chain for file-store recordings, outermost first
    #[serde(default)]
    pub context_path: Vec<String>,
    /// Which source produced this observation
    pub source: SourceTag,
}

impl Recording {
    /// Stable key for this recording
    ///
    /// Uses the source-assigned primary id when present; otherwise derives
    /// a synthetic key by hashing title, timestamp, and source so that the
    /// same observation always keys identically.
    pub fn key(&self) -> String {
        if let Some(id) = &self.primary_id {
            return id.clone();
        }

        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        if let Some(ts) = self.timestamp {
            hasher.update(ts.and_utc().timestamp().to_le_bytes());
        }
        hasher.update(self.source.as_str().as_bytes());
        let digest = hasher.finalize();
        let short: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
        format!("syn-{}", short)
    }

    /// Calendar date of the recording, if timestamped
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }

    /// Last context-path segment (the containing folder), if any
    pub fn folder_name(&self) -> Option<&str> {
        self.context_path.last().map(|s| s.as_str())
    }
}

// ============================================================================
// Week Inference
// ============================================================================

/// How a week number was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMethod {
    /// Explicit week marker in title/description metadata
    ExplicitMetadata,
    /// Computed from timestamp distance to the program start date
    TimestampArithmetic,
    /// Hit in the historical (coach, student, date) → week lookup
    HistoricalLookup,
    /// Interpolated between two known-week siblings
    Interpolation,
    /// Extrapolated from a single known-week sibling
    Extrapolation,
    /// Week marker in the containing folder name
    FolderName,
    /// Position among date-ordered siblings with no anchors
    SequentialFallback,
    /// Program-type default week
    ProgramDefault,
    /// Low-priority pattern scan over all text fields
    PatternFallback,
    /// Nothing matched; week 1 assumed
    DefaultFallback,
}

impl InferenceMethod {
    /// Method name as recorded in the ledger and events
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceMethod::ExplicitMetadata => "explicit_metadata",
            InferenceMethod::TimestampArithmetic => "timestamp_arithmetic",
            InferenceMethod::HistoricalLookup => "historical_lookup",
            InferenceMethod::Interpolation => "interpolation",
            InferenceMethod::Extrapolation => "extrapolation",
            InferenceMethod::FolderName => "folder_name",
            InferenceMethod::SequentialFallback => "sequential_fallback",
            InferenceMethod::ProgramDefault => "program_default",
            InferenceMethod::PatternFallback => "pattern_fallback",
            InferenceMethod::DefaultFallback => "default_fallback",
        }
    }
}

/// Candidate produced by a single inference tier
#[derive(Debug, Clone, PartialEq)]
pub struct WeekCandidate {
    /// Proposed program week (1-52)
    pub week: u8,
    /// Confidence on the cascade scale
    pub confidence: f32,
    /// Which method produced this candidate
    pub method: InferenceMethod,
    /// Human-readable justification lines
    pub evidence: Vec<String>,
}

/// Final week inference for one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekInference {
    /// Inferred program week (1-52)
    pub week: u8,
    /// Confidence on the cascade scale
    pub confidence: f32,
    /// Winning inference method
    pub method: InferenceMethod,
    /// Justification lines, including any per-tier extraction errors
    pub evidence: Vec<String>,
}

/// Week inference tier
///
/// All tiers implement this trait so the cascade can run them uniformly
/// and pick the highest-confidence candidate.
///
/// # Example
/// ```rust,ignore
/// use tutortrack_ri::types::{WeekTier, WeekCandidate, EvidenceError};
///
/// pub struct FolderTier;
///
/// impl WeekTier for FolderTier {
///     fn name(&self) -> &'static str { "folder" }
///     fn base_confidence(&self) -> f32 { 80.0 }
///
///     fn attempt(
///         &self,
///         recording: &Recording,
///         ctx: &InferenceContext,
///     ) -> Result<Option<WeekCandidate>, EvidenceError> {
///         // Scan the containing folder name for a week marker
///         Ok(None)
///     }
/// }
/// ```
pub trait WeekTier: Send + Sync {
    /// Tier name for evidence and statistics
    fn name(&self) -> &'static str;

    /// Highest confidence this tier can produce
    fn base_confidence(&self) -> f32;

    /// Attempt to produce a week candidate for one recording
    ///
    /// # Arguments
    /// * `recording` - The recording under inference
    /// * `ctx` - Program context (start date, lookup, siblings, ladder)
    ///
    /// # Returns
    /// `Ok(None)` when this tier has nothing to say about the recording.
    ///
    /// # Errors
    /// Returns `EvidenceError` for malformed inputs; the cascade records
    /// the error as evidence and continues with the remaining tiers.
    fn attempt(
        &self,
        recording: &Recording,
        ctx: &InferenceContext,
    ) -> Result<Option<WeekCandidate>, EvidenceError>;
}

/// Historical (coach, student, date) → week lookup
///
/// Injected into the cascade so callers decide where history comes from:
/// the in-memory map for tests, or a snapshot preloaded from SQLite for
/// service passes.
pub trait WeekLookup: Send + Sync {
    /// Return the recorded week for this coach/student/date, if known
    fn lookup(&self, coach: &str, student: &str, date: NaiveDate) -> Option<u8>;
}

/// Evidence extraction error
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// Failed to parse a timestamp field
    #[error("Timestamp parse error: {0}")]
    TimestampParse(String),

    /// A pattern matched but its capture did not yield a usable number
    #[error("Pattern capture error: {0}")]
    PatternCapture(String),

    /// Historical lookup failed
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}

// ============================================================================
// Identity Matching
// ============================================================================

/// Identity match classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Primary ids agree; same recording
    Exact,
    /// Strong circumstantial agreement
    FuzzyHigh,
    /// Plausible candidates; human review needed
    FuzzyLow,
    /// No counterpart found
    Unmatched,
}

impl MatchStatus {
    /// Status name as reported in reconciliation output
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Exact => "exact",
            MatchStatus::FuzzyHigh => "fuzzy_high",
            MatchStatus::FuzzyLow => "fuzzy_low",
            MatchStatus::Unmatched => "unmatched",
        }
    }
}

/// Which step of the match cascade produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Exact primary-id equality
    PrimaryId,
    /// Shared secondary id with timestamps within tolerance
    SecondaryIdDate,
    /// Same calendar date with strong participant overlap
    DateParticipants,
    /// Weighted composite similarity scan
    WeightedSimilarity,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::PrimaryId => "primary_id",
            MatchMethod::SecondaryIdDate => "secondary_id_date",
            MatchMethod::DateParticipants => "date_participants",
            MatchMethod::WeightedSimilarity => "weighted_similarity",
        }
    }
}

/// Alternate match candidate retained for review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Position of the candidate in the target corpus
    pub target_index: usize,
    /// Candidate recording key
    pub key: String,
    /// Composite similarity score (0.0-1.0)
    pub score: f32,
}

/// Outcome of matching one query recording against the target index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Match classification
    pub status: MatchStatus,
    /// Match confidence (0.0-1.0)
    pub confidence: f32,
    /// Position of the accepted target, when one was accepted
    pub matched: Option<usize>,
    /// Cascade step that produced the result
    pub method: Option<MatchMethod>,
    /// Ranked alternates for human review (fuzzy-low results)
    pub candidates: Vec<MatchCandidate>,
}

impl MatchOutcome {
    /// An unmatched outcome carrying the best score seen, if any
    pub fn unmatched(best_score: f32) -> Self {
        Self {
            status: MatchStatus::Unmatched,
            confidence: best_score,
            matched: None,
            method: None,
            candidates: Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
