//! Declarative week-marker pattern tables
//!
//! All week extraction from free text goes through one generic scanner over
//! static tables of `(pattern, priority, exclusion)` entries. Tiers differ
//! only in which table they consult and how they map priority to confidence,
//! so adding a new title convention means adding one table row.
//!
//! # Tables
//! - `metadata_patterns()` - explicit week markers in titles/descriptions
//! - `folder_patterns()` - week markers in folder-name segments
//! - `bare_number_patterns()` - last-resort generic numbers
//!
//! Tables are ordered by ascending priority; the scanner takes the first
//! valid hit in table order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::MAX_PROGRAM_WEEK;

/// One row of a week-pattern table
pub struct WeekPattern {
    /// Pattern name for evidence lines
    pub name: &'static str,
    /// Compiled expression with one or two number captures
    pub regex: Regex,
    /// 1-based priority, lower = more specific
    pub priority: u8,
    /// Reject a match when the text after it continues with any of these words
    pub exclude_if_followed_by: &'static [&'static str],
}

impl WeekPattern {
    fn new(
        name: &'static str,
        pattern: &str,
        priority: u8,
        exclude_if_followed_by: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            // Table entries are static literals; a bad one is a programming
            // error caught by the table tests below.
            regex: Regex::new(pattern).expect("invalid week pattern"),
            priority,
            exclude_if_followed_by,
        }
    }
}

/// A successful week-pattern hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekHit {
    /// Extracted week number (1-52)
    pub week: u8,
    /// Name of the matching pattern
    pub pattern: &'static str,
    /// Priority of the matching pattern
    pub priority: u8,
}

/// Week markers in titles and descriptions
///
/// The combined session/week form sits at priority 1 ahead of the plain
/// week label so both its capture groups are considered together.
pub fn metadata_patterns() -> &'static [WeekPattern] {
    static TABLE: Lazy<Vec<WeekPattern>> = Lazy::new(|| {
        vec![
            WeekPattern::new(
                "session_week_combo",
                r"(?i)\bsession\s*#?\s*(\d{1,2})\s*[|/–-]\s*week\s*#?\s*(\d{1,2})\b",
                1,
                &[],
            ),
            WeekPattern::new("week_label", r"(?i)\bweek\s*#?\s*(\d{1,2})\b", 1, &[]),
            WeekPattern::new("wk_label", r"(?i)\bwk\s*\.?\s*#?\s*(\d{1,2})\b", 2, &[]),
            WeekPattern::new("w_number", r"(?i)\bw(\d{1,2})\b", 3, &[]),
            WeekPattern::new("session_label", r"(?i)\bsession\s*#?\s*(\d{1,2})\b", 4, &[]),
            WeekPattern::new(
                "class_lesson_label",
                r"(?i)\b(?:class|lesson)\s*#?\s*(\d{1,2})\b",
                5,
                &[],
            ),
            // "3rd week" style; "12-week program" is a duration, not a marker
            WeekPattern::new(
                "number_week",
                r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?[\s-]*week\b",
                6,
                &["program"],
            ),
        ]
    });
    &TABLE
}

/// Week markers in folder-name segments of mirrored file stores
pub fn folder_patterns() -> &'static [WeekPattern] {
    static TABLE: Lazy<Vec<WeekPattern>> = Lazy::new(|| {
        vec![
            WeekPattern::new("wk_underscore", r"(?i)_wk\s*(\d{1,2})_", 1, &[]),
            WeekPattern::new("week_folder", r"(?i)\bweek[\s_-]*(\d{1,2})\b", 1, &[]),
            WeekPattern::new("wk_folder", r"(?i)\bwk[\s_-]*(\d{1,2})\b", 2, &[]),
            WeekPattern::new("w_folder", r"(?i)\bw(\d{1,2})\b", 3, &[]),
        ]
    });
    &TABLE
}

/// Generic numbers, consulted only when nothing else matched at all
///
/// A bare number directly followed by "week" is a duration phrase
/// ("12-week program" with the marker patterns already rejected), never a
/// week marker.
pub fn bare_number_patterns() -> &'static [WeekPattern] {
    static TABLE: Lazy<Vec<WeekPattern>> = Lazy::new(|| {
        vec![
            WeekPattern::new("hash_number", r"#\s*(\d{1,2})\b", 5, &[]),
            WeekPattern::new("bare_number", r"\b(\d{1,2})\b", 6, &["week", "program"]),
        ]
    });
    &TABLE
}

/// Scan text against a pattern table, returning the first valid hit
///
/// Within a pattern, matches are considered left to right and capture
/// groups first to second; the first group that parses into 1-52 wins.
/// Excluded matches (followed by the pattern's exclusion word) are skipped.
pub fn scan_week(text: &str, table: &[WeekPattern]) -> Option<WeekHit> {
    for pattern in table {
        for caps in pattern.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if pattern
                .exclude_if_followed_by
                .iter()
                .any(|word| followed_by_word(text, whole.end(), word))
            {
                continue;
            }
            for group in 1..caps.len() {
                let Some(m) = caps.get(group) else { continue };
                if let Ok(week) = m.as_str().parse::<u8>() {
                    if (1..=MAX_PROGRAM_WEEK).contains(&week) {
                        return Some(WeekHit {
                            week,
                            pattern: pattern.name,
                            priority: pattern.priority,
                        });
                    }
                }
            }
        }
    }
    None
}

/// Does the text after `from` continue with `word` (skipping separators)?
fn followed_by_word(text: &str, from: usize, word: &str) -> bool {
    let tail = text[from..].trim_start_matches(|c: char| c.is_whitespace() || c == '-' || c == '–');
    if !tail.to_lowercase().starts_with(word) {
        return false;
    }
    // Word boundary: the next char must not extend the word
    match tail.chars().nth(word.chars().count()) {
        None => true,
        Some(c) => !c.is_alphanumeric(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_label_basic() {
        let hit = scan_week("Ada <> Grace | Week 7", metadata_patterns()).unwrap();
        assert_eq!(hit.week, 7);
        assert_eq!(hit.pattern, "week_label");
        assert_eq!(hit.priority, 1);
    }

    #[test]
    fn test_week_label_case_and_hash() {
        assert_eq!(
            scan_week("WEEK #12 recap", metadata_patterns()).unwrap().week,
            12
        );
        // Compressed form without a space still reads as a marker
        assert_eq!(scan_week("week3", metadata_patterns()).unwrap().week, 3);
    }

    #[test]
    fn test_session_week_combo_prefers_first_group() {
        let hit = scan_week("Session 12 | Week 12", metadata_patterns()).unwrap();
        assert_eq!(hit.week, 12);
        assert_eq!(hit.pattern, "session_week_combo");

        // Groups are synonymous; the first valid one wins even when they differ
        let hit = scan_week("Session 3 - Week 4", metadata_patterns()).unwrap();
        assert_eq!(hit.week, 3);
    }

    #[test]
    fn test_wk_and_w_forms() {
        assert_eq!(scan_week("Wk 3 checkin", metadata_patterns()).unwrap().week, 3);
        let hit = scan_week("Ada W4", metadata_patterns()).unwrap();
        assert_eq!(hit.week, 4);
        assert_eq!(hit.priority, 3);
    }

    #[test]
    fn test_session_and_lesson_labels() {
        assert_eq!(
            scan_week("Session 9 with Grace", metadata_patterns()).unwrap().week,
            9
        );
        assert_eq!(
            scan_week("Lesson 2: fractions", metadata_patterns()).unwrap().week,
            2
        );
    }

    #[test]
    fn test_ordinal_week_form() {
        let hit = scan_week("3rd week review", metadata_patterns()).unwrap();
        assert_eq!(hit.week, 3);
        assert_eq!(hit.pattern, "number_week");
    }

    #[test]
    fn test_program_duration_never_extracts() {
        assert_eq!(scan_week("12-week program intro", metadata_patterns()), None);
        assert_eq!(scan_week("12 week program intro", metadata_patterns()), None);
        assert_eq!(scan_week("the 8-Week Program", metadata_patterns()), None);
    }

    #[test]
    fn test_program_duration_with_marker_elsewhere() {
        // The duration phrase is rejected; the real marker still wins
        let hit =
            scan_week("12-week program - Week 4", metadata_patterns()).unwrap();
        assert_eq!(hit.week, 4);
    }

    #[test]
    fn test_out_of_range_weeks_rejected() {
        assert_eq!(scan_week("Week 67", metadata_patterns()), None);
        assert_eq!(scan_week("Week 0", metadata_patterns()), None);
        assert_eq!(scan_week("Week 52", metadata_patterns()).unwrap().week, 52);
    }

    #[test]
    fn test_first_match_wins_within_pattern() {
        let hit = scan_week("Week 88 then Week 5", metadata_patterns()).unwrap();
        assert_eq!(hit.week, 5); // 88 out of range, scanning continues
    }

    #[test]
    fn test_bare_numbers_only_in_fallback_table() {
        assert_eq!(scan_week("Ada Grace 7", metadata_patterns()), None);
        let hit = scan_week("Ada Grace 7", bare_number_patterns()).unwrap();
        assert_eq!(hit.week, 7);
        assert_eq!(hit.pattern, "bare_number");
    }

    #[test]
    fn test_bare_number_rejects_duration_phrase() {
        // "12" here is the duration of "12 week program", not a marker
        assert_eq!(scan_week("12 week program", bare_number_patterns()), None);
        assert_eq!(scan_week("12-week program", bare_number_patterns()), None);
    }

    #[test]
    fn test_bare_number_rejects_program_phrase() {
        // A number qualifying "program" is a cohort/track label, not a week
        assert_eq!(scan_week("cohort 12 program", bare_number_patterns()), None);
        // Whole-word exclusion only; "programming" is a different word
        assert_eq!(
            scan_week("club 12 programming", bare_number_patterns()).unwrap().week,
            12
        );
    }

    #[test]
    fn test_hash_number_fallback() {
        let hit = scan_week("Ada #3", bare_number_patterns()).unwrap();
        assert_eq!(hit.week, 3);
        assert_eq!(hit.pattern, "hash_number");
    }

    #[test]
    fn test_folder_patterns() {
        assert_eq!(
            scan_week("Ada_Wk3_Drive", folder_patterns()).unwrap().week,
            3
        );
        assert_eq!(scan_week("Week 4", folder_patterns()).unwrap().week, 4);
        assert_eq!(scan_week("week_10", folder_patterns()).unwrap().week, 10);
        assert_eq!(scan_week("W7", folder_patterns()).unwrap().week, 7);
        assert_eq!(scan_week("Spring 2025", folder_patterns()), None);
    }

    #[test]
    fn test_tables_sorted_by_priority() {
        for table in [metadata_patterns(), folder_patterns(), bare_number_patterns()] {
            let priorities: Vec<u8> = table.iter().map(|p| p.priority).collect();
            let mut sorted = priorities.clone();
            sorted.sort_unstable();
            assert_eq!(priorities, sorted, "table must be ordered by priority");
        }
    }
}
