//! Loaded templates and the render call.

use tracing::debug;

use crate::cleaner;
use crate::config::CleanupOptions;
use crate::context::DataContext;
use crate::engine::RenderPass;
use crate::error::ScanWarning;
use crate::normalize::normalize_line_endings;
use crate::translate::Translation;

/// Default variable delimiter.
pub const DEFAULT_DELIMITER: char = '#';

/// Per-call render settings.
///
/// Translation is configured here rather than globally, and only the
/// outermost render applies it; repeat items are always rendered without it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig<'a> {
    pub cleanup: CleanupOptions,
    pub translation: Option<Translation<'a>>,
}

impl<'a> RenderConfig<'a> {
    pub fn new(cleanup: CleanupOptions) -> Self {
        Self {
            cleanup,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: Translation<'a>) -> Self {
        self.translation = Some(translation);
        self
    }
}

/// Output of a render together with the warnings met on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub warnings: Vec<ScanWarning>,
}

/// Normalized template text and its delimiter.
///
/// A template is never changed by rendering; every render call works on its
/// own scan state, so one template can be rendered any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    delimiter: char,
}

impl Default for Template {
    fn default() -> Self {
        Self::new("")
    }
}

impl Template {
    /// Create a template from raw text, normalizing its line endings.
    pub fn new(text: &str) -> Self {
        Self {
            source: normalize_line_endings(text),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Render against `data` and clean the result.
    pub fn render(&self, data: &DataContext, cleanup: CleanupOptions) -> String {
        self.render_with(data, &RenderConfig::new(cleanup))
    }

    /// Render with full per-call configuration.
    pub fn render_with(&self, data: &DataContext, config: &RenderConfig<'_>) -> String {
        self.render_report(data, config).text
    }

    /// Render and also return every scan warning, including those from repeat items.
    pub fn render_report(&self, data: &DataContext, config: &RenderConfig<'_>) -> Rendered {
        debug!(
            "Rendering template ({} bytes, delimiter '{}')",
            self.source.len(),
            self.delimiter
        );
        let pass = RenderPass::new(&self.source, self.delimiter).run(data);

        let translated = config
            .translation
            .as_ref()
            .and_then(|translation| translation.apply(&pass.text));

        let text = cleaner::clean(translated.as_deref().unwrap_or(&pass.text), config.cleanup);
        Rendered {
            text,
            warnings: pass.warnings,
        }
    }

    /// The template text itself, cleaned but not rendered.
    pub fn template_html(&self, cleanup: CleanupOptions) -> String {
        cleaner::clean(&self.source, cleanup)
    }
}
