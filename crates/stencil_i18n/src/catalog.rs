//! Message catalogs.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stencil_engine::Translator;
use tracing::{debug, trace};

use crate::error::{I18nError, I18nResult};

/// Translations grouped by text domain.
///
/// On disk a catalog is a mapping of domain to a mapping of message to translation:
///
/// ```yaml
/// recipes:
///   Ingredients: Zutaten
///   Instructions: Zubereitung
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    domains: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one translation.
    pub fn insert(
        &mut self,
        domain: impl Into<String>,
        message: impl Into<String>,
        translation: impl Into<String>,
    ) {
        self.domains
            .entry(domain.into())
            .or_default()
            .insert(message.into(), translation.into());
    }

    /// Builder-style [`Catalog::insert`].
    pub fn with(
        mut self,
        domain: impl Into<String>,
        message: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        self.insert(domain, message, translation);
        self
    }

    pub fn lookup(&self, message: &str, domain: &str) -> Option<&str> {
        self.domains
            .get(domain)
            .and_then(|messages| messages.get(message))
            .map(String::as_str)
    }

    /// Number of messages in `domain`.
    pub fn domain_len(&self, domain: &str) -> usize {
        self.domains.get(domain).map_or(0, HashMap::len)
    }

    pub fn from_yaml_str(content: &str) -> I18nResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> I18nResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a catalog, choosing the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> I18nResult<Self> {
        let path = path.as_ref();
        debug!("Loading message catalog from {:?}", path);
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(I18nError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl Translator for Catalog {
    fn translate(&self, text: &str, domain: &str) -> String {
        match self.lookup(text, domain) {
            Some(translation) => translation.to_string(),
            None => {
                trace!("No translation for '{}' in domain {}", text, domain);
                text.to_string()
            }
        }
    }
}
