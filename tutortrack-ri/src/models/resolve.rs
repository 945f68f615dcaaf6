//! Wire models for the resolve and reconcile endpoints
//!
//! Sources deliver timestamps as strings in whatever format they favor,
//! so the wire forms keep them raw and conversion to engine types is
//! lenient: a bad timestamp degrades to a date stamp scanned from the
//! title, never a rejected request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extractors::dates::{parse_timestamp, scan_date_stamp};
use crate::inference::{MethodTally, SiblingSession};
use crate::reconcile::ReconciliationReport;
use crate::types::{InferenceMethod, Recording, SourceTag};

/// One recording as delivered on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingDto {
    #[serde(default)]
    pub primary_id: Option<String>,
    #[serde(default)]
    pub secondary_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw timestamp string, parsed leniently
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub context_path: Vec<String>,
    pub source: SourceTag,
}

impl RecordingDto {
    /// Convert to the engine's recording form
    ///
    /// An unparseable or missing timestamp falls back to a date stamp
    /// found in the title (midnight); failing that the recording stays
    /// untimestamped and the timestamp tier will have nothing to say.
    pub fn into_recording(self) -> Recording {
        let timestamp = match &self.timestamp {
            Some(raw) => match parse_timestamp(raw) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    tracing::warn!(
                        raw = %raw,
                        error = %e,
                        title = %self.title,
                        "Unparseable timestamp, scanning title for a date stamp"
                    );
                    stamp_from_title(&self.title)
                }
            },
            None => stamp_from_title(&self.title),
        };

        Recording {
            primary_id: self.primary_id,
            secondary_id: self.secondary_id,
            title: self.title,
            description: self.description,
            timestamp,
            duration_secs: self.duration_secs,
            participants: self.participants,
            context_path: self.context_path,
            source: self.source,
        }
    }
}

fn stamp_from_title(title: &str) -> Option<chrono::NaiveDateTime> {
    scan_date_stamp(title).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Sibling session as delivered on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiblingDto {
    pub key: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub week: Option<u8>,
}

impl SiblingDto {
    pub fn into_sibling(self) -> SiblingSession {
        let timestamp = self.timestamp.as_deref().and_then(|raw| {
            parse_timestamp(raw)
                .map_err(|e| {
                    tracing::warn!(key = %self.key, error = %e, "Unparseable sibling timestamp");
                    e
                })
                .ok()
        });
        SiblingSession {
            key: self.key,
            timestamp,
            week: self.week,
        }
    }
}

/// Program context shared by every recording in a resolve request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveContextDto {
    /// First day of program week 1 (ISO date)
    #[serde(default)]
    pub program_start: Option<NaiveDate>,
    #[serde(default)]
    pub coach: Option<String>,
    #[serde(default)]
    pub student: Option<String>,
    /// Default week for this program type
    #[serde(default)]
    pub default_week: Option<u8>,
    /// Other sessions from the same pairing
    #[serde(default)]
    pub siblings: Vec<SiblingDto>,
    /// Known roster for snapping extracted names
    #[serde(default)]
    pub roster: Vec<String>,
}

/// POST /resolve request
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub recordings: Vec<RecordingDto>,
    #[serde(default)]
    pub context: ResolveContextDto,
}

/// One resolved recording in the response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedRecording {
    pub recording_key: String,
    pub week: u8,
    pub confidence: f32,
    pub method: InferenceMethod,
    pub evidence: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standardized_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_confidence: Option<f32>,
}

/// POST /resolve response
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub session_id: Uuid,
    pub results: Vec<ResolvedRecording>,
    pub methods: MethodTally,
    pub duration_ms: u64,
}

/// POST /reconcile request
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub queries: Vec<RecordingDto>,
    pub targets: Vec<RecordingDto>,
}

/// POST /reconcile response
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub session_id: Uuid,
    pub report: ReconciliationReport,
    pub duration_ms: u64,
}
