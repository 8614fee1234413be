//! Reading-order normalization of positioned tokens.
//!
//! Ordinals in templates address the sequence produced here, so the sort must
//! be stable: tokens sharing a `y` keep the order the decoder emitted them in.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::model::{Page, PositionedToken, RawPage, RawToken};

/// Sort tokens into canonical reading order (`y` ascending, stable).
///
/// `f64::total_cmp` gives a total order, so NaN coordinates sort after every
/// finite value instead of scrambling the sequence.
pub fn normalize(mut tokens: Vec<PositionedToken>) -> Vec<PositionedToken> {
    tokens.sort_by(|a, b| a.y.total_cmp(&b.y));
    tokens
}

/// Decode a percent-encoded fragment.
///
/// Returns `None` for malformed escapes (`%` not followed by two hex digits)
/// or when the decoded bytes are not valid UTF-8.
pub fn decode_text(encoded: &str) -> Option<Cow<'_, str>> {
    if has_malformed_escape(encoded) {
        return None;
    }
    urlencoding::decode(encoded).ok()
}

fn has_malformed_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return true;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    false
}

/// Turns raw decoder pages into canonical [`Page`]s.
#[derive(Debug, Clone, Copy)]
pub struct TokenNormalizer {
    normalize_unicode: bool,
}

impl TokenNormalizer {
    /// Create a normalizer that applies NFC to decoded text.
    pub fn new() -> Self {
        Self {
            normalize_unicode: true,
        }
    }

    /// Enable or disable NFC normalization of decoded text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Decode every token, dropping the ones that fail.
    ///
    /// Returns the decoded tokens in input order and the number dropped.
    pub fn decode(&self, page_num: u32, raw: &[RawToken]) -> (Vec<PositionedToken>, u32) {
        let mut dropped = 0;
        let tokens = raw
            .iter()
            .enumerate()
            .filter_map(|(index, token)| match decode_text(&token.encoded_text) {
                Some(text) => {
                    let text = if self.normalize_unicode {
                        text.nfc().collect::<String>()
                    } else {
                        text.into_owned()
                    };
                    Some(PositionedToken::new(token.x, token.y, text))
                }
                None => {
                    log::warn!(
                        "page {}: dropping token #{} at ({}, {}): cannot decode {:?}",
                        page_num,
                        index + 1,
                        token.x,
                        token.y,
                        token.encoded_text
                    );
                    dropped += 1;
                    None
                }
            })
            .collect();
        (tokens, dropped)
    }

    /// Decode and sort one page.
    pub fn normalize_page(&self, page_num: u32, raw: &RawPage) -> Page {
        let (tokens, dropped) = self.decode(page_num, &raw.tokens);
        Page {
            number: page_num,
            tokens: normalize(tokens),
            dropped,
        }
    }
}

impl Default for TokenNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
