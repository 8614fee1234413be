//! Declarative templates: schema, extraction, profile dispatch and config.

mod config;
mod extract;
mod registry;
mod schema;

pub use extract::{resolve, ScanEntry};
pub use registry::{Profile, ProfileRegistry};
pub use schema::{FieldMapping, KeyedField, Role, RowTemplate, Template, MAX_ROW_COUNT};
