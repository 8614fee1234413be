//! Page-level types.

use super::{PositionedToken, RawToken};
use serde::{Deserialize, Serialize};

/// A page as delivered by the upstream decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// Fragments in decoder order
    #[serde(default)]
    pub tokens: Vec<RawToken>,
}

impl RawPage {
    /// Create a page from raw tokens.
    pub fn new(tokens: Vec<RawToken>) -> Self {
        Self { tokens }
    }

    /// Get the number of raw tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// A decoded page in canonical reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Tokens sorted by `y` ascending
    pub tokens: Vec<PositionedToken>,

    /// Number of raw tokens dropped because their text failed to decode
    pub dropped: u32,
}

impl Page {
    /// Create a page from already normalized tokens.
    pub fn new(number: u32, tokens: Vec<PositionedToken>) -> Self {
        Self {
            number,
            tokens,
            dropped: 0,
        }
    }

    /// Get the token at a 1-based ordinal.
    pub fn token(&self, ordinal: u32) -> Option<&PositionedToken> {
        token_at(&self.tokens, ordinal)
    }

    /// Get the number of tokens on the page.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the page has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Look up a token by 1-based ordinal. Ordinal 0 never matches.
pub(crate) fn token_at(tokens: &[PositionedToken], ordinal: u32) -> Option<&PositionedToken> {
    let index = usize::try_from(ordinal).ok()?.checked_sub(1)?;
    tokens.get(index)
}
