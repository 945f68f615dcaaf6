//! Coach/student name extraction from session titles
//!
//! Session titles carry the participant pair in a handful of separator
//! conventions ("Ada <> Grace", "Ada w/ Grace | Week 3", "Ada - Grace").
//! Sources consistently write the student first, so the left side of a
//! pair is the student and the right side the coach.
//!
//! Extracted names can be snapped to a known roster with fuzzy matching,
//! which both fixes transcription drift ("Gracce") and raises the name
//! confidence for ledger rows.

use once_cell::sync::Lazy;
use regex::Regex;

use super::dates::scan_date_stamp;
use super::week_patterns::{metadata_patterns, scan_week};
use crate::types::Recording;

/// Minimum similarity for snapping an extracted name to a roster entry
pub const ROSTER_MATCH_THRESHOLD: f32 = 0.85;

/// Extracted participant pair with extraction confidence
#[derive(Debug, Clone, PartialEq)]
pub struct NamePair {
    /// Student display name (left side of the pair)
    pub student: String,
    /// Coach display name (right side of the pair)
    pub coach: String,
    /// Extraction confidence (0.0-1.0), by pattern specificity
    pub confidence: f32,
    /// Which convention matched, for evidence lines
    pub pattern: &'static str,
}

impl NamePair {
    /// Canonical ledger form: "Student <> Coach"
    pub fn standardized(&self) -> String {
        format!("{} <> {}", self.student, self.coach)
    }
}

/// Extract a name pair from a session title
///
/// Week markers, date stamps, and empty segments are stripped before the
/// separator conventions are tried, so "Ada w/ Grace | Week 3" reads the
/// same as "Ada w/ Grace".
pub fn extract_name_pair(title: &str) -> Option<NamePair> {
    static WITH_PAIR: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+w(?:/|ith)\s+(.+)$").expect("invalid name pattern"));

    let segments = clean_segments(title);
    let first = segments.first()?;

    // "<>" is the export convention and the strongest signal
    if let Some((left, right)) = first.split_once("<>") {
        return pair_from(left, right, 0.95, "angle_pair");
    }

    if let Some(caps) = WITH_PAIR.captures(first) {
        return pair_from(&caps[1], &caps[2], 0.85, "with_pair");
    }

    // Spaced dash only; hyphenated surnames stay intact
    if let Some((left, right)) = first.split_once(" - ") {
        return pair_from(left, right, 0.7, "dash_pair");
    }

    if let Some((left, right)) = first.split_once(" & ") {
        return pair_from(left, right, 0.65, "ampersand_pair");
    }

    // "Ada | Grace | Week 3": two plain segments form the pair
    if segments.len() >= 2 {
        return pair_from(&segments[0], &segments[1], 0.6, "segment_pair");
    }

    None
}

/// Name pair for a recording: title first, participant list as fallback
pub fn name_pair_for(recording: &Recording) -> Option<NamePair> {
    if let Some(pair) = extract_name_pair(&recording.title) {
        return Some(pair);
    }
    if recording.participants.len() >= 2 {
        return pair_from(
            &recording.participants[0],
            &recording.participants[1],
            0.5,
            "participant_list",
        );
    }
    None
}

/// Split a title on '|' and drop segments that carry no name information
fn clean_segments(title: &str) -> Vec<String> {
    title
        .split('|')
        .map(str::trim)
        .filter(|seg| !seg.is_empty())
        .filter(|seg| scan_week(seg, metadata_patterns()).is_none())
        .filter(|seg| scan_date_stamp(seg).is_none())
        .map(|seg| seg.to_string())
        .collect()
}

fn pair_from(left: &str, right: &str, confidence: f32, pattern: &'static str) -> Option<NamePair> {
    let student = standardize_name(left);
    let coach = standardize_name(right);
    if student.is_empty() || coach.is_empty() {
        return None;
    }
    Some(NamePair {
        student,
        coach,
        confidence,
        pattern,
    })
}

/// Normalize a display name: collapse whitespace, title-case each word
pub fn standardize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Snap an extracted name to the closest roster entry
///
/// Returns the roster spelling and its similarity when the best match
/// clears `ROSTER_MATCH_THRESHOLD`. Comparison is case-insensitive
/// Jaro-Winkler, ties going to the earlier roster entry.
pub fn canonicalize_name(name: &str, roster: &[String]) -> Option<(String, f32)> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;
    for (i, entry) in roster.iter().enumerate() {
        let similarity = strsim::jaro_winkler(&needle, &entry.trim().to_lowercase()) as f32;
        if best.map_or(true, |(_, b)| similarity > b) {
            best = Some((i, similarity));
        }
    }

    match best {
        Some((i, similarity)) if similarity >= ROSTER_MATCH_THRESHOLD => {
            Some((roster[i].clone(), similarity))
        }
        _ => None,
    }
}
