//! # unfield
//!
//! Template-driven field extraction from positioned PDF text fragments.
//!
//! Some documents (meter-reading reports, for example) carry no semantic
//! labels once decoded: each page is just a flat list of text fragments with
//! coordinates. This library sorts those fragments into reading order and reads
//! fields by their ordinal position, as described by declarative templates.
//!
//! ## Quick Start
//!
//! ```
//! use unfield::{render, ProfileRegistry, Unfield};
//!
//! fn main() -> unfield::Result<()> {
//!     let registry = ProfileRegistry::from_toml_str(
//!         r#"
//!         [[profiles.meter.single_fields]]
//!         name = "status"
//!         ordinal = 2
//!         "#,
//!     )?;
//!
//!     let json = r#"{
//!         "pages": [{"tokens": [
//!             {"x": 4.1, "y": 3.2, "encodedText": "Active"},
//!             {"x": 1.0, "y": 3.1, "encodedText": "Meter%20Status"}
//!         ]}],
//!         "metadata": {"CreationDate": "D:20210914154800-07'00'"}
//!     }"#;
//!
//!     let extraction = Unfield::new()
//!         .with_registry(registry)
//!         .with_profile("meter")
//!         .extract_str(json)?;
//!
//!     assert_eq!(extraction.records[0].get("status"), Some("Active"));
//!     assert_eq!(extraction.metadata["CreationDate"], "2021-09-14 15:48:00");
//!     println!("{}", render::to_json(&extraction, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Stable reading order**: fragments sorted by `y`, ties kept in decoder order
//! - **Declarative templates**: single, keyed, row-group and aggregate fields
//! - **Fixed-shape tables**: row groups always emit their declared row count
//! - **Profiles**: TOML or JSON configuration, with a safe default template
//! - **Never-failing extraction**: missing tokens become empty fields
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod assemble;
pub mod error;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod render;
pub mod template;

// Re-export commonly used types
pub use assemble::{PageScan, RecordAssembler};
pub use error::{Error, Result};
pub use metadata::{format_timestamp, parse_timestamp, MetadataFormatter, Timestamp};
pub use model::{
    FieldMap, Metadata, Page, PositionedToken, RawDocument, RawMetadata, RawPage, RawToken, Record,
    Row,
};
pub use parser::{
    normalize, parse_document, parse_document_bytes, parse_document_reader, ExtractOptions,
    PageSelection, ScanOptions, TokenNormalizer,
};
pub use render::{Extraction, ExtractionStats, JsonFormat};
pub use template::{
    FieldMapping, KeyedField, Profile, ProfileRegistry, Role, RowTemplate, ScanEntry, Template,
};

use std::io::Read;
use std::path::Path;

/// Extract records from a decoded document given as JSON.
///
/// # Arguments
///
/// * `json` - Decoded document (`{"pages": [...], "metadata": {...}}`)
/// * `registry` - Profiles to choose the template from
/// * `profile` - Profile id; `None` or an unknown id uses the default template
///
/// # Errors
///
/// Returns [`Error::Ingestion`] if the document cannot be read. Extraction
/// itself never fails.
pub fn extract_str(json: &str, registry: &ProfileRegistry, profile: Option<&str>) -> Result<Extraction> {
    let doc = parse_document(json)?;
    Ok(RecordAssembler::new(registry).assemble(&doc, profile))
}

/// Extract records from a decoded document read from a reader.
pub fn extract_reader<R: Read>(
    reader: R,
    registry: &ProfileRegistry,
    profile: Option<&str>,
) -> Result<Extraction> {
    let doc = parse_document_reader(reader)?;
    Ok(RecordAssembler::new(registry).assemble(&doc, profile))
}

/// Builder for extracting records from decoded documents.
///
/// # Example
///
/// ```no_run
/// use unfield::{PageSelection, Unfield};
///
/// let extraction = Unfield::new()
///     .with_profiles_file("profiles.toml")?
///     .with_profile("meter_v2")
///     .with_pages(PageSelection::Range(1..=2))
///     .sequential()
///     .extract_str(r#"{"pages": []}"#)?;
/// # Ok::<(), unfield::Error>(())
/// ```
pub struct Unfield {
    registry: ProfileRegistry,
    profile: Option<String>,
    options: ExtractOptions,
    metadata: MetadataFormatter,
}

impl Unfield {
    /// Create a new builder with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: ProfileRegistry::new(),
            profile: None,
            options: ExtractOptions::default(),
            metadata: MetadataFormatter::default(),
        }
    }

    /// Use the given profile registry.
    pub fn with_registry(mut self, registry: ProfileRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Load the profile registry from a TOML or JSON file.
    pub fn with_profiles_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.registry = ProfileRegistry::from_path(path)?;
        Ok(self)
    }

    /// Select the profile used for every document.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
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

    /// Get the profile registry.
    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    fn assembler(&self) -> RecordAssembler<'_> {
        RecordAssembler::new(&self.registry)
            .with_options(self.options.clone())
            .with_metadata_formatter(self.metadata.clone())
    }

    /// Extract records from an already ingested document.
    pub fn extract(&self, doc: &RawDocument) -> Extraction {
        self.assembler().assemble(doc, self.profile.as_deref())
    }

    /// Extract records from a decoded document given as JSON.
    pub fn extract_str(&self, json: &str) -> Result<Extraction> {
        let doc = parse_document(json)?;
        Ok(self.extract(&doc))
    }

    /// Extract records from a decoded document read from a reader.
    pub fn extract_reader<R: Read>(&self, reader: R) -> Result<Extraction> {
        let doc = parse_document_reader(reader)?;
        Ok(self.extract(&doc))
    }

    /// List raw tokens with their bound fields, for authoring templates.
    pub fn scan(&self, doc: &RawDocument, options: ScanOptions) -> Vec<PageScan> {
        self.assembler().scan(doc, self.profile.as_deref(), options)
    }
}

impl Default for Unfield {
    fn default() -> Self {
        Self::new()
    }
}
