//! Profile to template dispatch.
//!
//! The registry is built once and only read afterwards, so it can be shared
//! across page workers without locking. Deciding which profile a document
//! belongs to is left to the caller.

use std::collections::HashMap;

use super::schema::Template;
use crate::error::{Error, Result};

/// A registered profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    /// A validated template
    Ready(Template),
    /// Declared but not implemented yet; resolves to the default template
    Planned,
}

/// Registry mapping profile identifiers to templates.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, Profile>,
    default: Template,
    default_id: Option<String>,
}

impl ProfileRegistry {
    /// Create a registry whose default is the empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given default template.
    pub fn with_default(default: Template) -> Result<Self> {
        default.validate()?;
        Ok(Self {
            default,
            ..Self::default()
        })
    }

    /// Register a template under a profile id.
    ///
    /// The template is validated here so that resolution never has to.
    pub fn register(&mut self, id: impl Into<String>, template: Template) -> Result<()> {
        let id = id.into();
        template
            .validate()
            .map_err(|e| Error::InvalidTemplate(format!("profile `{}`: {}", id, inner(&e))))?;
        self.profiles.insert(id, Profile::Ready(template));
        Ok(())
    }

    /// Declare a profile that is known but not implemented yet.
    pub fn register_planned(&mut self, id: impl Into<String>) {
        self.profiles.insert(id.into(), Profile::Planned);
    }

    /// Make a registered, ready profile the default.
    pub fn set_default_profile(&mut self, id: &str) -> Result<()> {
        match self.profiles.get(id) {
            Some(Profile::Ready(template)) => {
                self.default = template.clone();
                self.default_id = Some(id.to_string());
                Ok(())
            }
            Some(Profile::Planned) => Err(Error::Config(format!(
                "default profile `{}` is not implemented",
                id
            ))),
            None => Err(Error::Config(format!(
                "default profile `{}` is not registered",
                id
            ))),
        }
    }

    /// Resolve a profile id to its template. Never fails.
    ///
    /// Absent, unknown and planned ids all fall back to the default template.
    pub fn resolve(&self, id: Option<&str>) -> &Template {
        let Some(id) = id else {
            log::debug!("no profile given, using default template");
            return &self.default;
        };

        match self.profiles.get(id) {
            Some(Profile::Ready(template)) => template,
            Some(Profile::Planned) => {
                log::info!("profile `{}` is not implemented yet, using default template", id);
                &self.default
            }
            None => {
                log::warn!("unknown profile `{}`, using default template", id);
                &self.default
            }
        }
    }

    /// Get the default template.
    pub fn default_template(&self) -> &Template {
        &self.default
    }

    /// Get the id of the profile used as default, if one was designated.
    pub fn default_profile(&self) -> Option<&str> {
        self.default_id.as_deref()
    }

    /// Get a registered profile.
    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    /// Check if a profile id is registered (ready or planned).
    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    /// Get all registered profile ids, sorted.
    pub fn profile_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Get the number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if no profiles are registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn inner(err: &Error) -> String {
    match err {
        Error::InvalidTemplate(msg) => msg.clone(),
        other => other.to_string(),
    }
}
