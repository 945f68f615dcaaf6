//! In-memory week history
//!
//! Snapshot of previously resolved (coach, student, date) -> week
//! assignments, loaded from the database before a resolution run. The
//! timestamp tier consults it when timestamp arithmetic has no program
//! start to work from.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::WeekLookup;

/// Week assignments keyed by normalized pairing and session date
#[derive(Debug, Clone, Default)]
pub struct MemoryWeekHistory {
    entries: HashMap<(String, String, NaiveDate), u8>,
}

impl MemoryWeekHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved week for a pairing and date
    ///
    /// Later records for the same key overwrite earlier ones.
    pub fn record(&mut self, coach: &str, student: &str, date: NaiveDate, week: u8) {
        self.entries
            .insert((normalize(coach), normalize(student), date), week);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WeekLookup for MemoryWeekHistory {
    fn lookup(&self, coach: &str, student: &str, date: NaiveDate) -> Option<u8> {
        self.entries
            .get(&(normalize(coach), normalize(student), date))
            .copied()
    }
}

/// Names compare case-insensitively with surrounding whitespace ignored
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_record_and_lookup() {
        let mut history = MemoryWeekHistory::new();
        history.record("Grace Hopper", "Ada Lovelace", date(2025, 3, 4), 5);

        assert_eq!(
            history.lookup("Grace Hopper", "Ada Lovelace", date(2025, 3, 4)),
            Some(5)
        );
        assert_eq!(
            history.lookup("Grace Hopper", "Ada Lovelace", date(2025, 3, 5)),
            None
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut history = MemoryWeekHistory::new();
        history.record("grace hopper", " Ada Lovelace ", date(2025, 3, 4), 5);

        assert_eq!(
            history.lookup("GRACE HOPPER", "ada lovelace", date(2025, 3, 4)),
            Some(5)
        );
    }

    #[test]
    fn test_later_record_overwrites() {
        let mut history = MemoryWeekHistory::new();
        history.record("Grace", "Ada", date(2025, 3, 4), 5);
        history.record("Grace", "Ada", date(2025, 3, 4), 6);

        assert_eq!(history.lookup("Grace", "Ada", date(2025, 3, 4)), Some(6));
        assert_eq!(history.len(), 1);
    }
}
