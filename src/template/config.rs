//! Profile configuration files.
//!
//! Templates are data, so new layouts ship as configuration:
//!
//! ```toml
//! default = "meter_v2"
//!
//! [profiles.meter_v2]
//! skip_ordinals = [12, 13, 14]
//!
//! [[profiles.meter_v2.single_fields]]
//! name = "status"
//! ordinal = 9
//!
//! [[profiles.meter_v2.keyed_fields]]
//! name = "pressure_base"
//! key_ordinal = 11
//! value_ordinal = 10
//!
//! [profiles.meter_v2.row_group]
//! base_ordinal = 101
//! stride = 10
//! row_count = 2
//! columns = { energy = 0, demand = 1 }
//!
//! [profiles.meter_v3]
//! planned = true
//! ```
//!
//! The same structure is accepted as JSON. Every template is validated while
//! the file loads.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::registry::ProfileRegistry;
use super::schema::Template;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    profiles: BTreeMap<String, ProfileConfig>,
}

#[derive(Debug, Deserialize)]
struct ProfileConfig {
    #[serde(default)]
    planned: bool,
    #[serde(flatten)]
    template: Template,
}

impl ProfileRegistry {
    /// Build a registry from a TOML profile configuration.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(s)?;
        Self::from_file(file)
    }

    /// Build a registry from a JSON profile configuration.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: RegistryFile =
            serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        Self::from_file(file)
    }

    /// Load a profile configuration file.
    ///
    /// Files ending in `.json` are read as JSON, everything else as TOML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let registry = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        registry.map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    fn from_file(file: RegistryFile) -> Result<Self> {
        let mut registry = ProfileRegistry::new();

        for (id, profile) in file.profiles {
            if profile.planned {
                if !profile.template.is_empty() {
                    return Err(Error::Config(format!(
                        "planned profile `{}` must not declare fields",
                        id
                    )));
                }
                registry.register_planned(id);
            } else {
                registry.register(id, profile.template)?;
            }
        }

        if let Some(id) = file.default.as_deref() {
            registry.set_default_profile(id)?;
        }

        log::debug!(
            "loaded {} profiles (default: {})",
            registry.len(),
            registry.default_profile().unwrap_or("<empty>")
        );
        Ok(registry)
    }
}

impl Template {
    /// Parse and validate a single template from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let template: Template = toml::from_str(s)?;
        template.validate()?;
        Ok(template)
    }

    /// Parse and validate a single template from JSON.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let template: Template =
            serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        template.validate()?;
        Ok(template)
    }
}
