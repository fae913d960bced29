//! Template loading functionality.
//!
//! Sources are inline text, a whole file, or a "page" file whose body sits
//! between `<!-- START PAGE -->` and `<!-- END PAGE -->` markers, with any
//! `<!-- START IGNORE -->`…`<!-- END IGNORE -->` blocks removed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::template::{Template, DEFAULT_DELIMITER};

pub const START_PAGE: &str = "<!-- START PAGE -->";
pub const END_PAGE: &str = "<!-- END PAGE -->";
pub const START_IGNORE: &str = "<!-- START IGNORE -->";
pub const END_IGNORE: &str = "<!-- END IGNORE -->";

/// How a source argument should be interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Inline,
    File,
    #[default]
    Page,
}

impl SourceMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inline => "inline",
            Self::File => "file",
            Self::Page => "page",
        }
    }
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    File(PathBuf),
    Page(PathBuf),
}

impl TemplateSource {
    /// Build a source from a mode and its argument (text or path).
    pub fn from_mode(mode: SourceMode, arg: impl Into<String>) -> Self {
        let arg = arg.into();
        match mode {
            SourceMode::Inline => Self::Inline(arg),
            SourceMode::File => Self::File(PathBuf::from(arg)),
            SourceMode::Page => Self::Page(PathBuf::from(arg)),
        }
    }
}

/// Template loader.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    delimiter: char,
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateLoader {
    /// Create a loader producing templates with the default delimiter.
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Set the delimiter given to loaded templates.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a template, reporting failures as a diagnostic and an empty template.
    pub fn load(&self, source: &TemplateSource) -> Template {
        match self.try_load(source) {
            Ok(template) => template,
            Err(e) => {
                warn!("{}", e);
                Template::new("").with_delimiter(self.delimiter)
            }
        }
    }

    /// Load a template, returning the failure instead of logging it.
    pub fn try_load(&self, source: &TemplateSource) -> Result<Template, LoadError> {
        let text = Self::read_source(source)?;
        Ok(Template::new(&text).with_delimiter(self.delimiter))
    }

    /// Produce the raw (not yet normalized) template text for a source.
    pub fn read_source(source: &TemplateSource) -> Result<String, LoadError> {
        match source {
            TemplateSource::Inline(text) => Ok(text.clone()),
            TemplateSource::File(path) => Self::read_file(path),
            TemplateSource::Page(path) => {
                let page = Self::read_file(path)?;
                Self::extract_page(&page, path)
            }
        }
    }

    fn read_file(path: &Path) -> Result<String, LoadError> {
        debug!("Loading template from {:?}", path);
        fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Cut the page body out of `page` and drop its ignore blocks.
    ///
    /// `path` is used for diagnostics only.
    pub fn extract_page(page: &str, path: &Path) -> Result<String, LoadError> {
        let start = page
            .find(START_PAGE)
            .ok_or_else(|| LoadError::MissingMarker {
                marker: "START PAGE",
                path: path.to_path_buf(),
            })?
            + START_PAGE.len();
        let end = page[start..]
            .find(END_PAGE)
            .ok_or_else(|| LoadError::MissingMarker {
                marker: "END PAGE",
                path: path.to_path_buf(),
            })?
            + start;

        let mut body = page[start..end].to_string();
        while let Some(ignore_start) = body.find(START_IGNORE) {
            let search_from = ignore_start + START_IGNORE.len();
            let ignore_end = body[search_from..]
                .find(END_IGNORE)
                .ok_or_else(|| LoadError::UnterminatedIgnore {
                    path: path.to_path_buf(),
                })?
                + search_from;
            body.replace_range(ignore_start..ignore_end + END_IGNORE.len(), "");
        }

        Ok(body)
    }
}
