//! Translation pass collaborators.
//!
//! The engine does not parse HTML or look messages up itself. A [`DomAdapter`]
//! finds the marked elements, and a [`Translator`] supplies the replacement text.

use tracing::debug;

use crate::config::DEFAULT_MARKER_CLASS;

/// Looks up the translation of a message in a text domain.
pub trait Translator {
    /// Return the translation of `text`, or `text` itself when there is none.
    fn translate(&self, text: &str, domain: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, &str) -> String,
{
    fn translate(&self, text: &str, domain: &str) -> String {
        self(text, domain)
    }
}

/// Handle to an element inside a [`DomDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub usize);

/// A parsed document the translation pass can edit.
pub trait DomDocument {
    /// Elements whose class list contains `class`, in document order.
    ///
    /// Element handles from an earlier query are invalidated.
    fn find_by_marker_class(&mut self, class: &str) -> Vec<ElementId>;

    /// The element's current inner content as markup.
    fn read_inner_content(&self, element: ElementId) -> String;

    /// Replace the element's content with `text`.
    fn write_inner_content(&mut self, element: ElementId, text: &str);

    /// Serialize the document back to HTML.
    fn serialize(&self) -> String;
}

/// Parses HTML into an editable [`DomDocument`].
pub trait DomAdapter {
    /// Parse `html`, or `None` if it cannot be parsed.
    fn parse(&self, html: &str) -> Option<Box<dyn DomDocument>>;
}

/// Everything the translation pass needs for one render call.
#[derive(Clone, Copy)]
pub struct Translation<'a> {
    pub text_domain: &'a str,
    pub marker_class: &'a str,
    pub translator: &'a dyn Translator,
    pub adapter: Option<&'a dyn DomAdapter>,
}

impl<'a> Translation<'a> {
    pub fn new(text_domain: &'a str, translator: &'a dyn Translator) -> Self {
        Self {
            text_domain,
            marker_class: DEFAULT_MARKER_CLASS,
            translator,
            adapter: None,
        }
    }

    pub fn with_marker_class(mut self, marker_class: &'a str) -> Self {
        self.marker_class = marker_class;
        self
    }

    pub fn with_adapter(mut self, adapter: &'a dyn DomAdapter) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Translate every marked element of `html`.
    ///
    /// Returns `None` when there is nothing to do: no adapter, a document that
    /// does not parse, or no marked elements.
    pub fn apply(&self, html: &str) -> Option<String> {
        let adapter = self.adapter?;
        let mut doc = adapter.parse(html)?;

        let elements = doc.find_by_marker_class(self.marker_class);
        if elements.is_empty() {
            return None;
        }

        for element in elements {
            let original = doc.read_inner_content(element);
            let translated = self.translator.translate(&original, self.text_domain);
            if translated != original {
                debug!("Translated '{}' in domain {}", original, self.text_domain);
                doc.write_inner_content(element, &translated);
            }
        }

        Some(doc.serialize())
    }
}

impl std::fmt::Debug for Translation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translation")
            .field("text_domain", &self.text_domain)
            .field("marker_class", &self.marker_class)
            .field("adapter", &self.adapter.is_some())
            .finish()
    }
}
