//! Record assembly: one record per page from a decoded document.
//!
//! # Example
//!
//! ```
//! use unfield::assemble::RecordAssembler;
//! use unfield::model::{RawDocument, RawPage, RawToken};
//! use unfield::template::{FieldMapping, ProfileRegistry, Template};
//!
//! let mut registry = ProfileRegistry::new();
//! registry
//!     .register("simple", Template::new().with_field(FieldMapping::value("status", 2)))
//!     .unwrap();
//!
//! let mut doc = RawDocument::new();
//! doc.add_page(RawPage::new(vec![
//!     RawToken::new(0.0, 2.0, "Active"),
//!     RawToken::new(0.0, 1.0, "Meter%20Status"),
//! ]));
//!
//! let extraction = RecordAssembler::new(&registry).assemble(&doc, Some("simple"));
//! assert_eq!(extraction.records[0].get("status"), Some("Active"));
//! ```

use rayon::prelude::*;
use serde::Serialize;

use crate::metadata::MetadataFormatter;
use crate::model::{Page, RawDocument, RawPage, Record};
use crate::parser::{ExtractOptions, ScanOptions, TokenNormalizer};
use crate::render::{Extraction, ExtractionStats};
use crate::template::{ProfileRegistry, ScanEntry, Template};

/// Raw token listing for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageScan {
    /// Page number (1-indexed)
    pub page: u32,

    /// Visible, non-skipped tokens
    pub entries: Vec<ScanEntry>,
}

/// Applies a resolved template to every selected page of a document.
///
/// Assembly never fails. Missing tokens become empty fields and undecodable
/// tokens are dropped; both are counted in [`ExtractionStats`].
#[derive(Debug, Clone)]
pub struct RecordAssembler<'r> {
    registry: &'r ProfileRegistry,
    options: ExtractOptions,
    metadata: MetadataFormatter,
}

impl<'r> RecordAssembler<'r> {
    /// Create an assembler over a registry with default options.
    pub fn new(registry: &'r ProfileRegistry) -> Self {
        Self {
            registry,
            options: ExtractOptions::default(),
            metadata: MetadataFormatter::default(),
        }
    }

    /// Set extract options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the metadata formatter.
    pub fn with_metadata_formatter(mut self, formatter: MetadataFormatter) -> Self {
        self.metadata = formatter;
        self
    }

    /// Get the extract options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    fn normalizer(&self) -> TokenNormalizer {
        TokenNormalizer::new().with_unicode_normalization(self.options.normalize_unicode)
    }

    fn selected_pages<'d>(&self, doc: &'d RawDocument) -> Vec<(u32, &'d RawPage)> {
        let pages: Vec<_> = doc
            .pages
            .iter()
            .zip(1u32..)
            .filter(|(_, number)| self.options.pages.includes(*number))
            .map(|(page, number)| (number, page))
            .collect();
        if pages.is_empty() && !doc.is_empty() {
            log::warn!(
                "page selection {:?} matches none of {} pages",
                self.options.pages,
                doc.page_count()
            );
        }
        pages
    }

    /// Decode and sort the selected pages without applying a template.
    pub fn normalize_pages(&self, doc: &RawDocument) -> Vec<Page> {
        let normalizer = self.normalizer();
        let pages = self.selected_pages(doc);
        let normalize = |&(number, raw): &(u32, &RawPage)| normalizer.normalize_page(number, raw);

        if self.options.parallel {
            pages.par_iter().map(normalize).collect()
        } else {
            pages.iter().map(normalize).collect()
        }
    }

    /// Build one record per selected page and format the document metadata.
    pub fn assemble(&self, doc: &RawDocument, profile: Option<&str>) -> Extraction {
        let template = self.registry.resolve(profile);
        let normalizer = self.normalizer();
        let pages = self.selected_pages(doc);

        let process = |&(number, raw): &(u32, &RawPage)| {
            let page = normalizer.normalize_page(number, raw);
            let record = template.apply(&page.tokens);
            let stats = page_stats(&page, &record);
            (number, record, stats)
        };

        let results: Vec<(u32, Record, ExtractionStats)> = if self.options.parallel {
            pages.par_iter().map(process).collect()
        } else {
            pages.iter().map(process).collect()
        };

        let mut stats = ExtractionStats::new();
        let mut page_numbers = Vec::with_capacity(results.len());
        let mut records = Vec::with_capacity(results.len());
        for (number, record, page_stats) in results {
            stats.merge(&page_stats);
            page_numbers.push(number);
            records.push(record);
        }

        let metadata = self.metadata.format(&doc.metadata);

        log::debug!(
            "assembled {} records from {} tokens ({} dropped, {} empty fields)",
            records.len(),
            stats.token_count,
            stats.dropped_tokens,
            stats.empty_fields
        );

        Extraction {
            records,
            metadata,
            page_numbers,
            stats,
        }
    }

    /// Apply a template to one already normalized page.
    pub fn assemble_page(&self, template: &Template, page: &Page) -> Record {
        template.apply(&page.tokens)
    }

    /// List raw tokens with their bound fields, for authoring templates.
    ///
    /// Lists the first `max_pages` selected pages, each limited to its first
    /// `max_tokens` tokens, hiding blank tokens and the template's
    /// `skip_ordinals`.
    pub fn scan(&self, doc: &RawDocument, profile: Option<&str>, scan: ScanOptions) -> Vec<PageScan> {
        let template = self.registry.resolve(profile);
        let normalizer = self.normalizer();
        let limit = if scan.max_pages == 0 {
            usize::MAX
        } else {
            scan.max_pages
        };

        self.selected_pages(doc)
            .into_iter()
            .take(limit)
            .map(|(number, raw)| {
                let page = normalizer.normalize_page(number, raw);
                PageScan {
                    page: number,
                    entries: template.scan(&page.tokens, scan.max_tokens),
                }
            })
            .collect()
    }
}

fn page_stats(page: &Page, record: &Record) -> ExtractionStats {
    ExtractionStats {
        page_count: 1,
        token_count: page.token_count() as u64,
        dropped_tokens: u64::from(page.dropped),
        filled_fields: record.filled_count() as u64,
        empty_fields: record.empty_count() as u64,
    }
}
