//! Input handling: ingestion, options and reading-order normalization.

mod ingest;
mod normalize;
mod options;

pub use ingest::{parse_document, parse_document_bytes, parse_document_reader};
pub use normalize::{decode_text, normalize, TokenNormalizer};
pub use options::{ExtractOptions, PageSelection, ScanOptions};
