//! Rendering module for turning extraction output into JSON or text.

mod json;
mod result;
mod text;

pub use json::{to_json, JsonFormat};
pub use result::{Extraction, ExtractionStats};
pub use text::{scan_to_text, to_text};
