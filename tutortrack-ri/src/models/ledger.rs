//! Tracking-ledger rows
//!
//! One row per resolved recording: who the session was for, which
//! program week it belongs to and how that was decided, and enough
//! provenance to audit the decision later.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extractors::names::NamePair;
use crate::types::{Recording, WeekInference};

/// One resolved recording in the session ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Row id
    pub id: Uuid,
    /// Stable key of the resolved recording
    pub recording_key: String,
    /// Meeting/room id, when the source had one
    pub secondary_id: Option<String>,
    /// "Student <> Coach" in canonical form, when names were extracted
    pub standardized_name: Option<String>,
    /// Name extraction confidence (0.0-1.0)
    pub name_confidence: Option<f32>,
    /// Resolved program week (1-52)
    pub week: u8,
    /// Week confidence on the cascade scale
    pub week_confidence: f32,
    /// Winning inference method name
    pub week_method: String,
    /// Participant display names
    pub participants: Vec<String>,
    /// Recording start time, when known
    pub recorded_at: Option<NaiveDateTime>,
    /// Recording length in seconds
    pub duration_secs: Option<u32>,
    /// Source name
    pub source: String,
    /// When this row was produced
    pub processed_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Assemble a ledger row from one recording's resolution results
    pub fn from_resolution(
        recording: &Recording,
        inference: &WeekInference,
        name_pair: Option<&NamePair>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recording_key: recording.key(),
            secondary_id: recording.secondary_id.clone(),
            standardized_name: name_pair.map(NamePair::standardized),
            name_confidence: name_pair.map(|p| p.confidence),
            week: inference.week,
            week_confidence: inference.confidence,
            week_method: inference.method.as_str().to_string(),
            participants: recording.participants.clone(),
            recorded_at: recording.timestamp,
            duration_secs: recording.duration_secs,
            source: recording.source.as_str().to_string(),
            processed_at: Utc::now(),
        }
    }
}
