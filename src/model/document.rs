//! Document-level types.

use super::RawPage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Formatted document metadata as a flat string map (e.g. `CreationDate`, `Producer`).
pub type Metadata = BTreeMap<String, String>;

/// Metadata as delivered by the decoder.
///
/// Values are usually strings, but decoders also emit flags
/// (`IsAcroFormPresent: false`) and structured XMP blobs.
pub type RawMetadata = BTreeMap<String, Value>;

/// A decoded document as delivered by the upstream decoder.
///
/// Created once per ingestion call and consumed synchronously.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Pages in document order
    #[serde(default)]
    pub pages: Vec<RawPage>,

    /// Document-level metadata
    #[serde(default)]
    pub metadata: RawMetadata,
}

impl RawDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&RawPage> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: RawPage) {
        self.pages.push(page);
    }

    /// Set a metadata entry.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
