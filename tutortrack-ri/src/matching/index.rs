//! Prebuilt lookup index over the target corpus
//!
//! Built once per reconciliation pass, before any query runs, so every
//! query sees the same corpus. Postings keep corpus order, which is what
//! makes tie-breaking deterministic downstream.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::Recording;

/// Target corpus with id and date lookup tables
#[derive(Debug, Default)]
pub struct RecordingIndex {
    records: Vec<Recording>,
    by_primary: HashMap<String, Vec<usize>>,
    by_secondary: HashMap<String, Vec<usize>>,
    by_date: HashMap<NaiveDate, Vec<usize>>,
}

impl RecordingIndex {
    /// Index a target corpus; ids are keyed verbatim
    pub fn build(records: Vec<Recording>) -> Self {
        let mut index = Self {
            records,
            ..Default::default()
        };

        for (i, rec) in index.records.iter().enumerate() {
            if let Some(id) = &rec.primary_id {
                index.by_primary.entry(id.clone()).or_default().push(i);
            }
            if let Some(id) = &rec.secondary_id {
                index.by_secondary.entry(id.clone()).or_default().push(i);
            }
            if let Some(date) = rec.date() {
                index.by_date.entry(date).or_default().push(i);
            }
        }

        index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Recording] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Recording> {
        self.records.get(index)
    }

    /// Corpus positions with this primary id, in corpus order
    pub fn by_primary(&self, id: &str) -> &[usize] {
        self.by_primary.get(id).map_or(&[], Vec::as_slice)
    }

    /// Corpus positions with this secondary id, in corpus order
    pub fn by_secondary(&self, id: &str) -> &[usize] {
        self.by_secondary.get(id).map_or(&[], Vec::as_slice)
    }

    /// Corpus positions recorded on this date, in corpus order
    pub fn by_date(&self, date: NaiveDate) -> &[usize] {
        self.by_date.get(&date).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceTag;

    fn recording(primary: Option<&str>, secondary: Option<&str>, day: u32) -> Recording {
        Recording {
            primary_id: primary.map(|s| s.to_string()),
            secondary_id: secondary.map(|s| s.to_string()),
            title: "untitled".to_string(),
            description: None,
            timestamp: NaiveDate::from_ymd_opt(2025, 3, day)
                .unwrap()
                .and_hms_opt(16, 0, 0),
            duration_secs: None,
            participants: vec![],
            context_path: vec![],
            source: SourceTag::CloudApi,
        }
    }

    #[test]
    fn test_lookup_tables_cover_all_records() {
        let index = RecordingIndex::build(vec![
            recording(Some("a"), Some("room-1"), 4),
            recording(Some("b"), Some("room-1"), 4),
            recording(None, None, 11),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.by_primary("a"), &[0]);
        assert_eq!(index.by_secondary("room-1"), &[0, 1]);
        assert_eq!(
            index.by_date(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()),
            &[0, 1]
        );
        assert_eq!(
            index.by_date(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()),
            &[2]
        );
    }

    #[test]
    fn test_missing_keys_give_empty_postings() {
        let index = RecordingIndex::build(vec![recording(Some("a"), None, 4)]);

        assert!(index.by_primary("zzz").is_empty());
        assert!(index.by_secondary("zzz").is_empty());
        assert!(index
            .by_date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
            .is_empty());
    }

    #[test]
    fn test_postings_keep_corpus_order() {
        let index = RecordingIndex::build(vec![
            recording(None, Some("room-1"), 4),
            recording(None, Some("room-1"), 5),
            recording(None, Some("room-1"), 3),
        ]);

        assert_eq!(index.by_secondary("room-1"), &[0, 1, 2]);
    }
}
