//! Extraction result with metadata and statistics.

use crate::model::{Metadata, Record};
use serde::Serialize;

/// Result of assembling a document: one record per selected page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    /// Records in page order
    pub records: Vec<Record>,

    /// Formatted document metadata
    pub metadata: Metadata,

    /// Page number (1-indexed) of each record
    #[serde(skip)]
    pub page_numbers: Vec<u32>,

    /// Extraction statistics
    #[serde(skip)]
    pub stats: ExtractionStats,
}

impl Extraction {
    /// Get the number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Get the record extracted from a page (1-indexed).
    pub fn record_for_page(&self, page: u32) -> Option<&Record> {
        self.page_numbers
            .iter()
            .position(|&n| n == page)
            .and_then(|index| self.records.get(index))
    }

    /// Iterate over `(page number, record)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Record)> {
        self.page_numbers.iter().copied().zip(self.records.iter())
    }
}

/// Statistics collected during extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Number of pages processed
    pub page_count: u64,

    /// Number of decoded tokens across all pages
    pub token_count: u64,

    /// Number of tokens dropped because their text failed to decode
    pub dropped_tokens: u64,

    /// Number of fields and row cells that resolved to a value
    pub filled_fields: u64,

    /// Number of fields and row cells that resolved to empty
    pub empty_fields: u64,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count = self.page_count.saturating_add(other.page_count);
        self.token_count = self.token_count.saturating_add(other.token_count);
        self.dropped_tokens = self.dropped_tokens.saturating_add(other.dropped_tokens);
        self.filled_fields = self.filled_fields.saturating_add(other.filled_fields);
        self.empty_fields = self.empty_fields.saturating_add(other.empty_fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_stats_merge() {
        let mut stats1 = ExtractionStats::new();
        stats1.page_count = 1;
        stats1.token_count = 40;

        let stats2 = ExtractionStats {
            page_count: 1,
            token_count: 12,
            dropped_tokens: 2,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.page_count, 2);
        assert_eq!(stats1.token_count, 52);
        assert_eq!(stats1.dropped_tokens, 2);
    }

    #[test]
    fn test_extraction_stats_merge_saturates() {
        let mut total = ExtractionStats {
            token_count: u64::MAX - 1,
            filled_fields: u64::MAX,
            ..Default::default()
        };
        let page = ExtractionStats {
            page_count: 1,
            token_count: 10,
            filled_fields: 3,
            ..Default::default()
        };

        total.merge(&page);

        assert_eq!(total.page_count, 1);
        assert_eq!(total.token_count, u64::MAX);
        assert_eq!(total.filled_fields, u64::MAX);
    }

    #[test]
    fn test_record_for_page() {
        let mut first = Record::new();
        first.fields.insert("status".to_string(), "A".to_string());
        let extraction = Extraction {
            records: vec![first, Record::new()],
            page_numbers: vec![3, 5],
            ..Default::default()
        };

        assert_eq!(
            extraction.record_for_page(3).and_then(|r| r.get("status")),
            Some("A")
        );
        assert!(extraction.record_for_page(4).is_none());
        assert_eq!(extraction.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec![3, 5]);
    }
}
