//! Plain text rendering for extraction output.

use std::fmt::Write;

use crate::assemble::PageScan;
use crate::model::Record;
use crate::template::Role;

use super::Extraction;

/// Render an extraction as `name: value` lines grouped by page.
///
/// Metadata comes first, then each page's fields, row cells as
/// `rows[i].column` and aggregate fields as `aggregate.name`.
pub fn to_text(extraction: &Extraction) -> String {
    let mut output = String::new();

    for (key, value) in &extraction.metadata {
        let _ = writeln!(output, "{}: {}", key, value);
    }

    for (number, record) in extraction.iter() {
        if !output.is_empty() {
            output.push('\n');
        }
        let _ = writeln!(output, "Page {}", number);
        write_record(&mut output, record);
    }

    output.trim_end().to_string()
}

fn write_record(output: &mut String, record: &Record) {
    for (name, value) in &record.fields {
        let _ = writeln!(output, "{}: {}", name, value);
    }
    for (index, row) in record.rows.iter().flatten().enumerate() {
        for (column, value) in row {
            let _ = writeln!(output, "rows[{}].{}: {}", index, column, value);
        }
    }
    for (name, value) in record.aggregate.iter().flatten() {
        let _ = writeln!(output, "aggregate.{}: {}", name, value);
    }
}

/// Render a raw token listing, one `ordinal  text` line per token.
pub fn scan_to_text(scans: &[PageScan]) -> String {
    let mut output = String::new();

    for scan in scans {
        if !output.is_empty() {
            output.push('\n');
        }
        let _ = writeln!(output, "Page {}", scan.page);
        for entry in &scan.entries {
            let _ = write!(output, "{:>4}  {}", entry.ordinal, entry.text);
            if let Some(field) = &entry.field {
                let role = match entry.role {
                    Some(Role::Key) => "key",
                    _ => "value",
                };
                let _ = write!(output, "  [{} {}]", field, role);
            }
            output.push('\n');
        }
    }

    output.trim_end().to_string()
}
