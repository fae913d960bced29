//! # stencil_i18n
//!
//! Concrete collaborators for the stencil translation pass:
//!
//! - [`Catalog`]: a [`stencil_engine::Translator`] backed by per-domain message tables
//! - [`MarkupAdapter`]: a [`stencil_engine::DomAdapter`] that locates marked
//!   elements with the `lol_html` rewriter, without building a full DOM

pub mod catalog;
pub mod error;
pub mod markup;

pub use catalog::Catalog;
pub use error::{I18nError, I18nResult};
pub use markup::{MarkupAdapter, MarkupDocument};
