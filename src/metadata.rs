//! Document metadata formatting.
//!
//! PDF dates arrive as `D:YYYYMMDDHHmmSS` followed by an optional timezone
//! suffix (`Z`, `+05'30'`, `-07'00'`, ...). They are rendered as
//! `YYYY-MM-DD HH:MM:SS` in the document's local time. Anything that does not
//! parse is passed through untouched.
//!
//! Boolean and numeric values are rendered as text. Nulls, arrays and objects
//! have no flat form and are left out.

use chrono::{FixedOffset, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::model::{Metadata, RawMetadata};

static PDF_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:D:)?(?P<stamp>[0-9]+)(?:(?P<utc>Z)(?:00'?(?:00'?)?)?|(?P<sign>[+-])(?P<hh>[0-9]{2})(?:'?(?P<mm>[0-9]{2}))?'?)?$",
    )
    .expect("PDF date pattern is valid")
});

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A parsed PDF timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Wall-clock time as written in the document
    pub local: NaiveDateTime,

    /// UTC offset from the suffix, if one was present
    pub offset: Option<FixedOffset>,
}

impl Timestamp {
    /// Render as `YYYY-MM-DD HH:MM:SS`.
    pub fn display(&self) -> String {
        self.local.format(DISPLAY_FORMAT).to_string()
    }
}

/// Parse a PDF timestamp with exactly 14 digits.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let caps = PDF_DATE.captures(raw.trim())?;
    let stamp = caps.name("stamp")?.as_str();
    if stamp.len() != 14 {
        return None;
    }

    let local = NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").ok()?;

    let offset = if caps.name("utc").is_some() {
        FixedOffset::east_opt(0)
    } else if let Some(sign) = caps.name("sign") {
        let hours: i32 = caps.name("hh")?.as_str().parse().ok()?;
        let minutes: i32 = caps
            .name("mm")
            .map_or(Some(0), |m| m.as_str().parse().ok())?;
        let seconds = hours * 3600 + minutes * 60;
        let seconds = if sign.as_str() == "-" { -seconds } else { seconds };
        Some(FixedOffset::east_opt(seconds)?)
    } else {
        None
    };

    Some(Timestamp { local, offset })
}

/// Format a PDF timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// Returns `raw` unchanged when it is not a 14-digit PDF date.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.display(),
        None => {
            log::debug!("passing through malformed timestamp {:?}", raw);
            raw.to_string()
        }
    }
}

/// Formats a document's metadata map.
#[derive(Debug, Clone)]
pub struct MetadataFormatter {
    /// Keys whose values are PDF timestamps
    pub timestamp_keys: Vec<String>,

    /// Keys holding binary or opaque values, omitted from output
    pub opaque_keys: Vec<String>,
}

impl MetadataFormatter {
    /// Create a formatter with the default key sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat an additional key as a timestamp.
    pub fn with_timestamp_key(mut self, key: impl Into<String>) -> Self {
        self.timestamp_keys.push(key.into());
        self
    }

    /// Omit an additional key from output.
    pub fn with_opaque_key(mut self, key: impl Into<String>) -> Self {
        self.opaque_keys.push(key.into());
        self
    }

    /// Replace the timestamp key set.
    pub fn with_timestamp_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timestamp_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the opaque key set.
    pub fn with_opaque_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opaque_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Format a metadata map.
    ///
    /// Opaque keys are dropped whatever their value type.
    pub fn format(&self, metadata: &RawMetadata) -> Metadata {
        metadata
            .iter()
            .filter(|(key, _)| !self.opaque_keys.iter().any(|k| k == *key))
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Null | Value::Array(_) | Value::Object(_) => {
                        log::debug!("skipping non-scalar metadata entry `{}`", key);
                        return None;
                    }
                };
                let text = if self.timestamp_keys.iter().any(|k| k == key) {
                    format_timestamp(&text)
                } else {
                    text
                };
                Some((key.clone(), text))
            })
            .collect()
    }
}

impl Default for MetadataFormatter {
    fn default() -> Self {
        Self {
            timestamp_keys: vec!["CreationDate".to_string(), "ModDate".to_string()],
            opaque_keys: vec!["Metadata".to_string()],
        }
    }
}
