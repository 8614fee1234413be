//! Extraction output types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field map in template declaration order.
pub type FieldMap = IndexMap<String, String>;

/// One row of a repeating tabular section.
pub type Row = FieldMap;

/// Structured output of applying a template to one page.
///
/// Serializes as a flat object: scalar fields at the top level, plus `rows`
/// and `aggregate` when the template declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Single and keyed fields
    #[serde(flatten)]
    pub fields: FieldMap,

    /// Fixed-length row table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,

    /// Aggregate (summary) fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<FieldMap>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a top-level field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get an aggregate field value.
    pub fn aggregate_value(&self, name: &str) -> Option<&str> {
        self.aggregate
            .as_ref()
            .and_then(|agg| agg.get(name))
            .map(String::as_str)
    }

    /// Get the number of rows (0 when the template has no row group).
    pub fn row_count(&self) -> usize {
        self.rows.as_ref().map_or(0, Vec::len)
    }

    /// Count fields, row cells and aggregate fields that resolved to a value.
    pub fn filled_count(&self) -> usize {
        let filled = |map: &FieldMap| map.values().filter(|v| !v.is_empty()).count();
        filled(&self.fields)
            + self.rows.iter().flatten().map(filled).sum::<usize>()
            + self.aggregate.as_ref().map_or(0, filled)
    }

    /// Count fields, row cells and aggregate fields that resolved to empty.
    pub fn empty_count(&self) -> usize {
        let empty = |map: &FieldMap| map.values().filter(|v| v.is_empty()).count();
        empty(&self.fields)
            + self.rows.iter().flatten().map(empty).sum::<usize>()
            + self.aggregate.as_ref().map_or(0, empty)
    }
}
