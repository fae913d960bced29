//! # stencil_engine
//!
//! Directive scanner and substitution engine for HTML-like templates.
//!
//! A template is rendered against a [`DataContext`] in a single pass. The
//! scanner recognises five directives:
//!
//! - `#name#` variables, replaced by the field's text
//! - `<!-- START REPEAT name -->`…`<!-- END REPEAT name -->` blocks, rendered
//!   once per item of a list field
//! - `<!-- START INCLUDEIF [!]name -->`…`<!-- END INCLUDEIF [!]name -->`
//!   blocks, kept or dropped depending on the field
//! - `<!-- START STRIP WHITESPACE -->` and `<!-- END STRIP WHITESPACE -->`,
//!   bounding regions whose inter-tag whitespace is collapsed
//!
//! Malformed directives never fail a render: they are copied through as text
//! and reported as [`ScanWarning`]s.
//!
//! ## Example
//!
//! ```rust
//! use stencil_engine::{CleanupOptions, DataContext, Template};
//!
//! let template = Template::new("Hello #name#!");
//! let data = DataContext::new().with("name", "World");
//!
//! assert_eq!(template.render(&data, CleanupOptions::PRESERVE_ALL), "Hello World!");
//! ```

pub mod cleaner;
pub mod config;
pub mod context;
pub mod directive;
pub mod engine;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod strip;
pub mod template;
pub mod translate;

pub use cleaner::clean;
pub use config::{CleanupOptions, StencilConfig, TranslationSettings, DEFAULT_MARKER_CLASS};
pub use context::{DataContext, Value};
pub use directive::{Directive, DirectiveKind};
pub use error::{LoadError, ScanWarning, TemplateError, TemplateResult};
pub use loader::{SourceMode, TemplateLoader, TemplateSource};
pub use normalize::normalize_line_endings;
pub use strip::StripMarker;
pub use template::{RenderConfig, Rendered, Template, DEFAULT_DELIMITER};
pub use translate::{DomAdapter, DomDocument, ElementId, Translation, Translator};
