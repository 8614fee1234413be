//! Token-level types.

use serde::{Deserialize, Serialize};

/// A text fragment as delivered by the upstream decoder.
///
/// The text is still in its transport encoding (percent-encoded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawToken {
    /// X position on the page
    pub x: f64,

    /// Y position on the page (grows downward)
    pub y: f64,

    /// Percent-encoded text content
    #[serde(rename = "encodedText")]
    pub encoded_text: String,
}

impl RawToken {
    /// Create a new raw token.
    pub fn new(x: f64, y: f64, encoded_text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            encoded_text: encoded_text.into(),
        }
    }
}

/// A decoded text fragment with its page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedToken {
    /// X position on the page
    pub x: f64,

    /// Y position on the page (grows downward)
    pub y: f64,

    /// Decoded text content
    pub text: String,
}

impl PositionedToken {
    /// Create a new positioned token.
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Check if the token carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
