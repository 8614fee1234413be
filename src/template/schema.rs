//! Declarative template types.
//!
//! A [`Template`] binds 1-based ordinals in a normalized page to named fields.
//! Adding a document layout means authoring one of these, usually in a
//! profile configuration file.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Names that would collide with the record's own keys.
const RESERVED_NAMES: [&str; 2] = ["rows", "aggregate"];

/// Upper bound on `row_count`; every row is emitted on every page.
pub const MAX_ROW_COUNT: u32 = 10_000;

/// Whether a mapped token is a label or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The token is a label (e.g., "Meter Status")
    Key,
    /// The token is a value
    #[default]
    Value,
}

/// A named field bound to a 1-based ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Output field name
    pub name: String,

    /// Label or value
    #[serde(default)]
    pub role: Role,

    /// 1-based position in the normalized page
    pub ordinal: u32,
}

impl FieldMapping {
    /// Create a value field.
    pub fn value(name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            name: name.into(),
            role: Role::Value,
            ordinal,
        }
    }

    /// Create a key (label) field.
    pub fn key(name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            name: name.into(),
            role: Role::Key,
            ordinal,
        }
    }
}

/// A field whose value token is paired with a label token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedField {
    /// Output field name
    pub name: String,

    /// Ordinal of the label token
    pub key_ordinal: u32,

    /// Ordinal of the value token
    pub value_ordinal: u32,

    /// Label text the key token is expected to carry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_key: Option<String>,
}

impl KeyedField {
    /// Create a keyed field.
    pub fn new(name: impl Into<String>, key_ordinal: u32, value_ordinal: u32) -> Self {
        Self {
            name: name.into(),
            key_ordinal,
            value_ordinal,
            expected_key: None,
        }
    }

    /// Set the expected label text.
    pub fn with_expected_key(mut self, key: impl Into<String>) -> Self {
        self.expected_key = Some(key.into());
        self
    }
}

/// A repeating tabular section addressed by base ordinal and stride.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTemplate {
    /// Ordinal of the first row's column offset 0
    pub base_ordinal: u32,

    /// Distance in ordinals between consecutive rows
    pub stride: u32,

    /// Number of rows always emitted
    pub row_count: u32,

    /// Column name to offset from the row's base ordinal
    pub columns: IndexMap<String, u32>,
}

impl RowTemplate {
    /// Create a row template without columns.
    pub fn new(base_ordinal: u32, stride: u32, row_count: u32) -> Self {
        Self {
            base_ordinal,
            stride,
            row_count,
            columns: IndexMap::new(),
        }
    }

    /// Add a column.
    pub fn with_column(mut self, name: impl Into<String>, offset: u32) -> Self {
        self.columns.insert(name.into(), offset);
        self
    }

    /// Ordinal of a column in row `row`, or `None` when it overflows.
    pub fn ordinal(&self, row: u32, offset: u32) -> Option<u32> {
        row.checked_mul(self.stride)
            .and_then(|o| o.checked_add(self.base_ordinal))
            .and_then(|o| o.checked_add(offset))
    }

    fn validate(&self) -> Result<()> {
        if self.base_ordinal == 0 {
            return Err(Error::InvalidTemplate(
                "row group base_ordinal must be at least 1".to_string(),
            ));
        }
        if self.row_count > MAX_ROW_COUNT {
            return Err(Error::InvalidTemplate(format!(
                "row group row_count {} exceeds the limit of {}",
                self.row_count, MAX_ROW_COUNT
            )));
        }
        if self.stride == 0 && self.row_count > 1 {
            return Err(Error::InvalidTemplate(
                "row group stride must be at least 1 when row_count > 1".to_string(),
            ));
        }
        if self.columns.is_empty() {
            return Err(Error::InvalidTemplate(
                "row group must declare at least one column".to_string(),
            ));
        }
        if let Some(name) = self.columns.keys().find(|name| name.trim().is_empty()) {
            return Err(Error::InvalidTemplate(format!(
                "row group column name {:?} is blank",
                name
            )));
        }
        Ok(())
    }
}

/// One document layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Ordinals hidden from raw token listings
    #[serde(default)]
    pub skip_ordinals: BTreeSet<u32>,

    /// Fields read directly from one ordinal
    #[serde(default)]
    pub single_fields: Vec<FieldMapping>,

    /// Fields read from a value ordinal paired with a label ordinal
    #[serde(default)]
    pub keyed_fields: Vec<KeyedField>,

    /// Repeating tabular section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_group: Option<RowTemplate>,

    /// Summary fields emitted under `aggregate`
    #[serde(default)]
    pub aggregate_fields: Vec<FieldMapping>,
}

impl Template {
    /// Create an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single field.
    pub fn with_field(mut self, field: FieldMapping) -> Self {
        self.single_fields.push(field);
        self
    }

    /// Add a keyed field.
    pub fn with_keyed_field(mut self, field: KeyedField) -> Self {
        self.keyed_fields.push(field);
        self
    }

    /// Set the row group.
    pub fn with_row_group(mut self, rows: RowTemplate) -> Self {
        self.row_group = Some(rows);
        self
    }

    /// Add an aggregate field.
    pub fn with_aggregate_field(mut self, field: FieldMapping) -> Self {
        self.aggregate_fields.push(field);
        self
    }

    /// Hide ordinals from raw token listings.
    pub fn with_skip_ordinals(mut self, ordinals: impl IntoIterator<Item = u32>) -> Self {
        self.skip_ordinals.extend(ordinals);
        self
    }

    /// Check if the template declares nothing to extract.
    pub fn is_empty(&self) -> bool {
        self.single_fields.is_empty()
            && self.keyed_fields.is_empty()
            && self.row_group.is_none()
            && self.aggregate_fields.is_empty()
    }

    /// Find the field bound to an ordinal, for annotating token listings.
    ///
    /// Row-group columns are reported as `column[row]` using 0-based rows.
    pub fn field_at(&self, ordinal: u32) -> Option<(String, Role)> {
        let single = self
            .single_fields
            .iter()
            .chain(&self.aggregate_fields)
            .find(|f| f.ordinal == ordinal)
            .map(|f| (f.name.clone(), f.role));
        if single.is_some() {
            return single;
        }

        for field in &self.keyed_fields {
            if field.value_ordinal == ordinal {
                return Some((field.name.clone(), Role::Value));
            }
            if field.key_ordinal == ordinal {
                return Some((field.name.clone(), Role::Key));
            }
        }

        let rows = self.row_group.as_ref()?;
        (0..rows.row_count).find_map(|row| {
            rows.columns.iter().find_map(|(name, &offset)| {
                (rows.ordinal(row, offset) == Some(ordinal))
                    .then(|| (format!("{}[{}]", name, row), Role::Value))
            })
        })
    }

    /// Validate the template.
    ///
    /// Ordinals may exceed any particular page's length, but must be 1-based.
    /// Field names must be unique across single, keyed and aggregate fields.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut check_name = |name: &str| -> Result<()> {
            if name.trim().is_empty() {
                return Err(Error::InvalidTemplate("field name is blank".to_string()));
            }
            if RESERVED_NAMES.contains(&name) {
                return Err(Error::InvalidTemplate(format!(
                    "field name `{}` is reserved",
                    name
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(Error::InvalidTemplate(format!(
                    "field name `{}` is declared more than once",
                    name
                )));
            }
            Ok(())
        };

        for field in self.single_fields.iter().chain(&self.aggregate_fields) {
            check_name(&field.name)?;
            check_ordinal(&field.name, field.ordinal)?;
        }
        for field in &self.keyed_fields {
            check_name(&field.name)?;
            check_ordinal(&field.name, field.key_ordinal)?;
            check_ordinal(&field.name, field.value_ordinal)?;
        }
        if self.skip_ordinals.contains(&0) {
            return Err(Error::InvalidTemplate(
                "skip_ordinals must be 1-based".to_string(),
            ));
        }
        if let Some(rows) = &self.row_group {
            rows.validate()?;
        }
        Ok(())
    }
}

fn check_ordinal(name: &str, ordinal: u32) -> Result<()> {
    if ordinal == 0 {
        return Err(Error::InvalidTemplate(format!(
            "field `{}` has ordinal 0; ordinals are 1-based",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter_template() -> Template {
        Template::new()
            .with_field(FieldMapping::value("status", 9))
            .with_keyed_field(KeyedField::new("pressure_base", 11, 10))
            .with_row_group(RowTemplate::new(101, 10, 2).with_column("energy", 0))
            .with_aggregate_field(FieldMapping::value("total", 130))
            .with_skip_ordinals(12..=19)
    }

    #[test]
    fn test_valid_template() {
        let template = meter_template();
        assert!(template.validate().is_ok());
        assert!(!template.is_empty());
        assert!(Template::new().is_empty());
        assert!(Template::new().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_ordinal() {
        let template = Template::new().with_field(FieldMapping::value("status", 0));
        assert!(matches!(
            template.validate(),
            Err(Error::InvalidTemplate(_))
        ));

        let template = Template::new().with_keyed_field(KeyedField::new("p", 0, 3));
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_and_reserved_names() {
        let template = Template::new()
            .with_field(FieldMapping::value("status", 1))
            .with_keyed_field(KeyedField::new("status", 2, 3));
        assert!(template.validate().is_err());

        let template = Template::new().with_field(FieldMapping::value("rows", 1));
        assert!(template.validate().is_err());

        let template = Template::new().with_aggregate_field(FieldMapping::value(" ", 1));
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_row_group() {
        let no_columns = Template::new().with_row_group(RowTemplate::new(1, 1, 3));
        assert!(no_columns.validate().is_err());

        let zero_stride =
            Template::new().with_row_group(RowTemplate::new(1, 0, 3).with_column("energy", 0));
        assert!(zero_stride.validate().is_err());

        let single_row =
            Template::new().with_row_group(RowTemplate::new(1, 0, 1).with_column("energy", 0));
        assert!(single_row.validate().is_ok());
    }

    #[test]
    fn test_rejects_oversized_row_count() {
        let rows = |count| {
            Template::new().with_row_group(RowTemplate::new(1, 1, count).with_column("energy", 0))
        };

        assert!(rows(MAX_ROW_COUNT).validate().is_ok());
        assert!(matches!(
            rows(4_000_000_000).validate(),
            Err(Error::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_row_ordinal_overflow() {
        let rows = RowTemplate::new(u32::MAX - 5, 10, 2).with_column("energy", 0);
        assert_eq!(rows.ordinal(0, 0), Some(u32::MAX - 5));
        assert_eq!(rows.ordinal(1, 0), None);
        assert_eq!(rows.ordinal(0, 6), None);
    }

    #[test]
    fn test_field_at() {
        let template = meter_template();
        assert_eq!(template.field_at(9), Some(("status".to_string(), Role::Value)));
        assert_eq!(
            template.field_at(11),
            Some(("pressure_base".to_string(), Role::Key))
        );
        assert_eq!(template.field_at(111), Some(("energy[1]".to_string(), Role::Value)));
        assert_eq!(template.field_at(130), Some(("total".to_string(), Role::Value)));
        assert_eq!(template.field_at(1), None);
    }
}
