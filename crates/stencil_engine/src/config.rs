//! Render and tool configuration types.

use std::fs;
use std::ops::BitOr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::loader::SourceMode;
use crate::template::DEFAULT_DELIMITER;

/// Default class marking elements for the translation pass.
pub const DEFAULT_MARKER_CLASS: &str = "xlate";

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "stencil.yaml";

/// Output cleanup flags.
///
/// With both flags off, single-line comments are removed and the output is
/// flattened to one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CleanupOptions {
    #[serde(default)]
    pub preserve_whitespace: bool,
    #[serde(default)]
    pub preserve_comments: bool,
}

impl CleanupOptions {
    pub const NONE: Self = Self {
        preserve_whitespace: false,
        preserve_comments: false,
    };
    pub const PRESERVE_WHITESPACE: Self = Self {
        preserve_whitespace: true,
        preserve_comments: false,
    };
    pub const PRESERVE_COMMENTS: Self = Self {
        preserve_whitespace: false,
        preserve_comments: true,
    };
    pub const PRESERVE_ALL: Self = Self {
        preserve_whitespace: true,
        preserve_comments: true,
    };

    /// Decode the bit-set form (1 = preserve whitespace, 2 = preserve comments).
    pub fn from_bits(bits: u8) -> Self {
        Self {
            preserve_whitespace: bits & 1 != 0,
            preserve_comments: bits & 2 != 0,
        }
    }

    pub fn bits(&self) -> u8 {
        u8::from(self.preserve_whitespace) | (u8::from(self.preserve_comments) << 1)
    }
}

impl BitOr for CleanupOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            preserve_whitespace: self.preserve_whitespace || rhs.preserve_whitespace,
            preserve_comments: self.preserve_comments || rhs.preserve_comments,
        }
    }
}

/// Translation settings as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSettings {
    /// Text domain passed to the translator
    pub text_domain: String,
    /// Class marking translatable elements
    #[serde(default = "default_marker_class")]
    pub marker_class: String,
    /// Message catalog file (YAML or JSON)
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

fn default_marker_class() -> String {
    DEFAULT_MARKER_CLASS.to_string()
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

/// Tool configuration, usually read from `stencil.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StencilConfig {
    /// Variable delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// How template arguments are read
    #[serde(default)]
    pub source_mode: SourceMode,
    /// Output cleanup
    #[serde(flatten)]
    pub cleanup: CleanupOptions,
    /// Optional translation pass
    #[serde(default)]
    pub translation: Option<TranslationSettings>,
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            source_mode: SourceMode::default(),
            cleanup: CleanupOptions::default(),
            translation: None,
        }
    }
}

impl StencilConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> TemplateResult<Self> {
        let config: StencilConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> TemplateResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load `stencil.yaml` from `dir` if present, otherwise the defaults.
    pub fn discover(dir: impl AsRef<Path>) -> TemplateResult<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject delimiters that can never bracket a variable.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.delimiter.is_whitespace() {
            return Err(TemplateError::InvalidConfig(
                "delimiter must not be whitespace".to_string(),
            ));
        }
        if let Some(translation) = &self.translation {
            if translation.marker_class.trim().is_empty() {
                return Err(TemplateError::InvalidConfig(
                    "translation marker_class must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn with_source_mode(mut self, mode: SourceMode) -> Self {
        self.source_mode = mode;
        self
    }
}
