//! Ingestion of decoded documents.
//!
//! The upstream decoder hands over JSON shaped as
//! `{ "pages": [ { "tokens": [ { "x", "y", "encodedText" } ] } ], "metadata": { .. } }`.
//! This is the single fatal step: a document that cannot be read produces one
//! error and no records.

use std::io::Read;

use crate::error::{Error, Result};
use crate::model::RawDocument;

/// Parse a decoded document from a JSON string.
pub fn parse_document(json: &str) -> Result<RawDocument> {
    serde_json::from_str(json).map_err(|e| Error::Ingestion(e.to_string()))
}

/// Parse a decoded document from JSON bytes.
pub fn parse_document_bytes(data: &[u8]) -> Result<RawDocument> {
    serde_json::from_slice(data).map_err(|e| Error::Ingestion(e.to_string()))
}

/// Parse a decoded document from a reader.
pub fn parse_document_reader<R: Read>(mut reader: R) -> Result<RawDocument> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_document_bytes(&data)
}
