//! Generic output cleanup: single-line comment removal and whitespace flattening.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::CleanupOptions;

static SINGLE_LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!-- .*? -->").unwrap());

/// Clean `html` according to `options`.
///
/// Passes repeat until the text stops changing, so cleaning an already
/// cleaned string with the same options returns it unchanged.
pub fn clean(html: &str, options: CleanupOptions) -> String {
    let mut current = clean_once(html, options);
    loop {
        let next = clean_once(&current, options);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(html: &str, options: CleanupOptions) -> String {
    let mut text = if options.preserve_comments {
        html.to_string()
    } else {
        remove_comments(html)
    };
    if !options.preserve_whitespace {
        text = flatten_whitespace(&text);
    }
    text
}

/// Remove every `<!-- text -->` comment that fits on one line.
pub fn remove_comments(html: &str) -> String {
    SINGLE_LINE_COMMENT.replace_all(html, "").into_owned()
}

/// Trim ASCII whitespace from every line, drop the empty ones, and join the rest with a trailing space each.
pub fn flatten_whitespace(html: &str) -> String {
    let mut flat = String::with_capacity(html.len());
    for line in html.split('\n') {
        let trimmed = line.trim_matches(|c: char| c.is_ascii_whitespace());
        if !trimmed.is_empty() {
            flat.push_str(trimmed);
            flat.push(' ');
        }
    }
    flat
}
