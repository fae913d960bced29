//! A [`DomAdapter`] built on the `lol_html` streaming rewriter.
//!
//! Finding marked elements is one rewriting pass that brackets the content of
//! each match with numbered comment marks. Reads, writes and serialization
//! then work on that annotated markup, so everything outside a rewritten
//! element is serialized back byte for byte.

use std::collections::BTreeMap;
use std::ops::Range;

use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings, Selector};
use once_cell::sync::Lazy;
use regex::Regex;
use stencil_engine::{DomAdapter, DomDocument, ElementId};
use tracing::{trace, warn};

const MARK_PREFIX: &str = "<!--stencil-mark-";

static MARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--stencil-mark-(open|close)-(\d+)-->").unwrap());

fn open_mark(index: usize) -> String {
    format!("{}open-{}-->", MARK_PREFIX, index)
}

fn close_mark(index: usize) -> String {
    format!("{}close-{}-->", MARK_PREFIX, index)
}

/// Selector matching `class` as one token of the class attribute.
fn class_selector(class: &str) -> Option<String> {
    if class.is_empty() || class.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        return None;
    }
    let selector = format!("[class~=\"{}\"]", class);
    selector.parse::<Selector>().ok().map(|_| selector)
}

/// Parses markup into a [`MarkupDocument`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupAdapter;

impl MarkupAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl DomAdapter for MarkupAdapter {
    fn parse(&self, html: &str) -> Option<Box<dyn DomDocument>> {
        if html.contains(MARK_PREFIX) {
            trace!("Markup already carries element marks; not parsing");
            return None;
        }
        Some(Box::new(MarkupDocument::new(html)))
    }
}

/// Markup plus the marked elements found by the last query.
#[derive(Debug, Clone, Default)]
pub struct MarkupDocument {
    html: String,
    /// `html` with each marked element's content bracketed by marks.
    annotated: Option<String>,
    /// Content range in `annotated`, keyed by match index.
    elements: BTreeMap<usize, Range<usize>>,
    /// Escaped replacement content, keyed by match index.
    replacements: BTreeMap<usize, String>,
}

impl MarkupDocument {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            ..Self::default()
        }
    }

    fn annotate(&self, selector: &str) -> Option<String> {
        let mut next = 0usize;
        let result = rewrite_str(
            &self.html,
            RewriteStrSettings {
                element_content_handlers: vec![element!(selector, |el| {
                    if el.can_have_content() {
                        el.prepend(&open_mark(next), ContentType::Html);
                        el.append(&close_mark(next), ContentType::Html);
                    }
                    next += 1;
                    Ok(())
                })],
                ..Default::default()
            },
        );

        match result {
            Ok(annotated) => Some(annotated),
            Err(e) => {
                warn!("Failed to scan markup for marked elements: {}", e);
                None
            }
        }
    }
}

/// Each mark in `annotated`: its span, whether it closes, and its index.
fn marks(annotated: &str) -> impl Iterator<Item = (Range<usize>, bool, usize)> + '_ {
    MARK.captures_iter(annotated).filter_map(|caps| {
        let whole = caps.get(0)?;
        let closes = caps.get(1)?.as_str() == "close";
        let index = caps.get(2)?.as_str().parse().ok()?;
        Some((whole.range(), closes, index))
    })
}

impl DomDocument for MarkupDocument {
    fn find_by_marker_class(&mut self, class: &str) -> Vec<ElementId> {
        self.annotated = None;
        self.elements.clear();
        self.replacements.clear();

        let Some(selector) = class_selector(class) else {
            warn!("Marker class '{}' is not a usable class token", class);
            return Vec::new();
        };
        let Some(annotated) = self.annotate(&selector) else {
            return Vec::new();
        };

        let mut open: BTreeMap<usize, usize> = BTreeMap::new();
        for (span, closes, index) in marks(&annotated) {
            if !closes {
                open.insert(index, span.end);
            } else if let Some(start) = open.remove(&index) {
                self.elements.insert(index, start..span.start);
            }
        }
        for index in open.keys() {
            trace!("Marked element {} has no end tag; skipping it", index);
        }

        self.annotated = Some(annotated);
        self.elements.keys().copied().map(ElementId).collect()
    }

    fn read_inner_content(&self, element: ElementId) -> String {
        if let Some(text) = self.replacements.get(&element.0) {
            return text.clone();
        }
        match (&self.annotated, self.elements.get(&element.0)) {
            (Some(annotated), Some(range)) => {
                MARK.replace_all(&annotated[range.clone()], "").into_owned()
            }
            _ => String::new(),
        }
    }

    fn write_inner_content(&mut self, element: ElementId, text: &str) {
        if self.elements.contains_key(&element.0) {
            self.replacements
                .insert(element.0, html_escape::encode_text(text).into_owned());
        }
    }

    fn serialize(&self) -> String {
        let Some(annotated) = &self.annotated else {
            return self.html.clone();
        };

        let mut html = String::with_capacity(annotated.len());
        let mut position = 0;
        // Index of a replaced element whose original content is being skipped
        let mut skipping: Option<usize> = None;

        for (span, closes, index) in marks(annotated) {
            if let Some(skip) = skipping {
                if closes && index == skip {
                    skipping = None;
                    position = span.end;
                }
                continue;
            }
            html.push_str(&annotated[position..span.start]);
            position = span.end;
            if !closes {
                if let Some(text) = self.replacements.get(&index) {
                    html.push_str(text);
                    skipping = Some(index);
                }
            }
        }
        html.push_str(&annotated[position..]);
        html
    }
}
