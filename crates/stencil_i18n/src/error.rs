//! Error types for translation collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type I18nResult<T> = Result<T, I18nError>;

/// Errors that can occur while loading a message catalog.
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Unsupported catalog format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
