//! Applying templates to normalized tokens.
//!
//! Every lookup here degrades to an empty string: an ordinal past the end of
//! the page, or a token holding only whitespace, yields `""`.

use serde::Serialize;

use super::schema::{FieldMapping, Role, RowTemplate, Template};
use crate::model::{token_at, FieldMap, PositionedToken, Record, Row};

/// Resolve a 1-based ordinal to trimmed text, or `""` when absent or blank.
pub fn resolve(tokens: &[PositionedToken], ordinal: u32) -> String {
    match token_at(tokens, ordinal) {
        Some(token) => token.trimmed().to_string(),
        None => {
            log::trace!(
                "ordinal {} is past the end of a {}-token page",
                ordinal,
                tokens.len()
            );
            String::new()
        }
    }
}

fn resolve_fields(fields: &[FieldMapping], tokens: &[PositionedToken]) -> FieldMap {
    fields
        .iter()
        .map(|field| (field.name.clone(), resolve(tokens, field.ordinal)))
        .collect()
}

impl RowTemplate {
    /// Extract exactly `row_count` rows.
    ///
    /// Rows past the end of the page are still emitted, with every column
    /// empty, so consumers always see a fixed-shape table.
    pub fn extract_rows(&self, tokens: &[PositionedToken]) -> Vec<Row> {
        (0..self.row_count)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|(name, &offset)| {
                        let value = self
                            .ordinal(row, offset)
                            .map(|ordinal| resolve(tokens, ordinal))
                            .unwrap_or_default();
                        (name.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

impl Template {
    /// Build the record for one normalized page.
    pub fn apply(&self, tokens: &[PositionedToken]) -> Record {
        let mut fields = resolve_fields(&self.single_fields, tokens);

        for keyed in &self.keyed_fields {
            let key = resolve(tokens, keyed.key_ordinal);
            let value = resolve(tokens, keyed.value_ordinal);

            if let Some(expected) = &keyed.expected_key {
                if !key.eq_ignore_ascii_case(expected.trim()) {
                    log::warn!(
                        "field `{}`: expected label {:?} at ordinal {}, found {:?}",
                        keyed.name,
                        expected,
                        keyed.key_ordinal,
                        key
                    );
                }
            } else {
                log::trace!("field `{}`: label {:?}, value {:?}", keyed.name, key, value);
            }

            fields.insert(keyed.name.clone(), value);
        }

        let rows = self
            .row_group
            .as_ref()
            .map(|rows| rows.extract_rows(tokens));

        let aggregate = if self.aggregate_fields.is_empty() {
            None
        } else {
            Some(resolve_fields(&self.aggregate_fields, tokens))
        };

        Record {
            fields,
            rows,
            aggregate,
        }
    }

    /// List a page's tokens for template authoring.
    ///
    /// Considers the first `max_tokens` tokens (0 = all), skipping blank tokens
    /// and `skip_ordinals`. Each entry is annotated with the field bound to its
    /// ordinal, if any.
    pub fn scan(&self, tokens: &[PositionedToken], max_tokens: usize) -> Vec<ScanEntry> {
        let limit = if max_tokens == 0 {
            tokens.len()
        } else {
            max_tokens
        };

        tokens
            .iter()
            .take(limit)
            .zip(1u32..)
            .filter(|(token, ordinal)| !token.is_blank() && !self.skip_ordinals.contains(ordinal))
            .map(|(token, ordinal)| {
                let (field, role) = match self.field_at(ordinal) {
                    Some((name, role)) => (Some(name), Some(role)),
                    None => (None, None),
                };
                ScanEntry {
                    ordinal,
                    text: token.trimmed().to_string(),
                    field,
                    role,
                }
            })
            .collect()
    }
}

/// One line of a raw token listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    /// 1-based ordinal in the normalized page
    pub ordinal: u32,

    /// Trimmed token text
    pub text: String,

    /// Field bound to this ordinal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Whether the bound field reads this token as label or value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}
