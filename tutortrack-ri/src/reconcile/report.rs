//! Reconciliation report
//!
//! Pure summary of one matching pass: every query lands in exactly one
//! bucket, in input order, so the same inputs always produce the same
//! report byte for byte.

use serde::{Deserialize, Serialize};

use crate::matching::{match_recording, RecordingIndex};
use crate::types::{MatchCandidate, MatchMethod, MatchStatus, Recording};

/// One query's matching result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Stable key of the query recording
    pub query_key: String,
    /// Match classification
    pub status: MatchStatus,
    /// Match confidence (0.0-1.0)
    pub confidence: f32,
    /// Key of the accepted target, when one was accepted
    pub matched_key: Option<String>,
    /// Cascade step that produced the result
    pub method: Option<MatchMethod>,
    /// Ranked alternates for review (fuzzy-low rows)
    pub candidates: Vec<MatchCandidate>,
}

/// Full result of matching a query corpus against a target corpus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Primary ids agreed
    pub exact_matches: Vec<ReportRow>,
    /// Strong circumstantial matches, accepted
    pub fuzzy_matches: Vec<ReportRow>,
    /// Plausible candidates needing human review
    pub possible_matches: Vec<ReportRow>,
    /// No counterpart found
    pub not_found: Vec<ReportRow>,
    /// Number of queries processed
    pub total: usize,
    /// Accepted matches (exact + fuzzy) as a percentage of total
    pub match_rate: f32,
}

impl ReconciliationReport {
    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} exact, {} fuzzy, {} possible, {} not found ({:.1}% matched)",
            self.exact_matches.len(),
            self.fuzzy_matches.len(),
            self.possible_matches.len(),
            self.not_found.len(),
            self.match_rate
        )
    }
}

/// Match every query against the target index and bucket the results
///
/// Queries are processed in input order and never mutated; review
/// candidates ride along on their rows.
pub fn build_report(queries: &[Recording], index: &RecordingIndex) -> ReconciliationReport {
    let mut report = ReconciliationReport {
        total: queries.len(),
        ..Default::default()
    };

    for query in queries {
        let outcome = match_recording(query, index);
        let row = ReportRow {
            query_key: query.key(),
            status: outcome.status,
            confidence: outcome.confidence,
            matched_key: outcome
                .matched
                .and_then(|i| index.get(i))
                .map(Recording::key),
            method: outcome.method,
            candidates: outcome.candidates,
        };
        match outcome.status {
            MatchStatus::Exact => report.exact_matches.push(row),
            MatchStatus::FuzzyHigh => report.fuzzy_matches.push(row),
            MatchStatus::FuzzyLow => report.possible_matches.push(row),
            MatchStatus::Unmatched => report.not_found.push(row),
        }
    }

    let accepted = report.exact_matches.len() + report.fuzzy_matches.len();
    report.match_rate = if report.total == 0 {
        0.0
    } else {
        accepted as f32 / report.total as f32 * 100.0
    };

    report
}
