//! Error types for unfield library.
//!
//! Only ingestion and configuration can fail. Template application, row
//! extraction and metadata formatting degrade to empty or raw values instead.

use std::io;
use thiserror::Error;

/// Result type alias for unfield operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading input or configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The decoded document could not be ingested.
    #[error("Document ingestion failed: {0}")]
    Ingestion(String),

    /// A template failed validation.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Profile configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error while rendering output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
