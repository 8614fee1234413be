//! Extraction options and configuration.

use std::ops::RangeInclusive;

/// Options for extracting records from a document.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to extract)
    pub pages: PageSelection,

    /// Normalize decoded token text to Unicode NFC
    pub normalize_unicode: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable NFC normalization of decoded text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            pages: PageSelection::All,
            normalize_unicode: true,
        }
    }
}

/// Options for the raw token listing used when authoring templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Number of leading tokens to consider per page (0 = unlimited)
    pub max_tokens: usize,

    /// Number of leading pages to list (0 = unlimited)
    pub max_pages: usize,
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of tokens considered per page.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Limit the number of pages listed.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// List every token on every page.
    pub fn unlimited() -> Self {
        Self {
            max_tokens: 0,
            max_pages: 0,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_tokens: 50,
            max_pages: 2,
        }
    }
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// Extract all pages
    #[default]
    All,
    /// Extract a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Extract specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }
}
