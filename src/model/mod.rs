//! Data model for positioned text fragments and extracted records.
//!
//! Raw types mirror what the upstream decoder produces. `Page` is the
//! canonical, reading-order form that templates address by ordinal.

mod document;
mod page;
mod record;
mod token;

pub use document::{Metadata, RawDocument, RawMetadata};
pub use page::{Page, RawPage};
pub(crate) use page::token_at;
pub use record::{FieldMap, Record, Row};
pub use token::{PositionedToken, RawToken};
