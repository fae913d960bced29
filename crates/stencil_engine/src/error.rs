//! Error and warning types for the engine.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors raised outside of a render call: configuration and data loading.
///
/// A render itself never fails; see [`ScanWarning`] for what it reports instead.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Invalid data context: {0}")]
    InvalidContext(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to produce template text from a source.
///
/// [`crate::TemplateLoader::load`] turns these into a diagnostic plus an empty template.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Can't open {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{marker} not found in {path:?}")]
    MissingMarker { marker: &'static str, path: PathBuf },

    #[error("END IGNORE not found in {path:?}")]
    UnterminatedIgnore { path: PathBuf },
}

/// A malformed or unsatisfied directive met while scanning.
///
/// Offsets are byte offsets into the input being scanned at the time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    #[error("Unknown variable '{name}' at {offset}")]
    UnknownVariable { offset: usize, name: String },

    #[error("Malformed START REPEAT at {offset} ({snippet})")]
    MalformedRepeat { offset: usize, snippet: String },

    #[error("Repeat source '{name}' at {offset} is missing or not a list")]
    RepeatTargetMissing { offset: usize, name: String },

    #[error("END REPEAT not found for {name} (started at {offset})")]
    RepeatEndMissing { offset: usize, name: String },

    #[error("Malformed START INCLUDEIF at {offset} ({snippet})")]
    MalformedIncludeIf { offset: usize, snippet: String },

    #[error("'{marker}' not found (started at {offset})")]
    IncludeIfEndMissing { offset: usize, marker: String },
}
