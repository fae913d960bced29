//! Directive recognition.
//!
//! The [`Scanner`] finds where the next directive starts; the `parse_*`
//! functions decide whether the text at that offset is well formed.

use memchr::memmem::Finder;
use once_cell::sync::Lazy;
use regex::Regex;

pub const START_REPEAT: &str = "<!-- START REPEAT ";
pub const START_INCLUDEIF: &str = "<!-- START INCLUDEIF ";
pub const START_STRIP: &str = "<!-- START STRIP WHITESPACE ";
pub const END_STRIP: &str = "<!-- END STRIP WHITESPACE ";

/// Length of `<!-- START STRIP WHITESPACE -->`.
pub const START_STRIP_LEN: usize = 31;
/// Length of `<!-- END STRIP WHITESPACE -->`.
pub const END_STRIP_LEN: usize = 29;

pub const MAX_VARIABLE_NAME: usize = 32;
pub const REPEAT_WINDOW: usize = 45;
pub const INCLUDEIF_WINDOW: usize = 60;

/// How far past the strip literal a closing `-->` is looked for.
const STRIP_CLOSE_WINDOW: usize = 32;

static REPEAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<!-- START REPEAT ([_a-zA-Z][_0-9a-zA-Z]{0,19}) -->").unwrap()
});

static INCLUDEIF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<!-- START INCLUDEIF (!?)([_a-zA-Z][_0-9a-zA-Z]{0,31}) -->").unwrap()
});

/// Kind of directive found at a scan position.
///
/// Declaration order is the tie-break order when two kinds start at the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Variable,
    Repeat,
    IncludeIf,
    StripStart,
    StripEnd,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 5] = [
        DirectiveKind::Variable,
        DirectiveKind::Repeat,
        DirectiveKind::IncludeIf,
        DirectiveKind::StripStart,
        DirectiveKind::StripEnd,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// A well-formed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Variable(String),
    RepeatStart(String),
    IncludeIfStart { name: String, negated: bool },
    StripStart,
    StripEnd,
}

impl Directive {
    /// Parse the directive of `kind` found at the start of `text`.
    ///
    /// `None` means the text only looked like a directive.
    pub fn parse(kind: DirectiveKind, text: &str, delimiter: char) -> Option<Directive> {
        match kind {
            DirectiveKind::Variable => {
                parse_variable(text, delimiter).map(|name| Directive::Variable(name.to_string()))
            }
            DirectiveKind::Repeat => {
                parse_repeat(text).map(|name| Directive::RepeatStart(name.to_string()))
            }
            DirectiveKind::IncludeIf => {
                parse_include_if(text).map(|(name, negated)| Directive::IncludeIfStart {
                    name: name.to_string(),
                    negated,
                })
            }
            DirectiveKind::StripStart => Some(Directive::StripStart),
            DirectiveKind::StripEnd => Some(Directive::StripEnd),
        }
    }

    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Variable(_) => DirectiveKind::Variable,
            Directive::RepeatStart(_) => DirectiveKind::Repeat,
            Directive::IncludeIfStart { .. } => DirectiveKind::IncludeIf,
            Directive::StripStart => DirectiveKind::StripStart,
            Directive::StripEnd => DirectiveKind::StripEnd,
        }
    }
}

/// Finds the nearest directive at or after an offset.
///
/// Positions found for each kind are cached. When text ahead of the cursor is
/// rewritten, [`Scanner::rescan`] must be told which span changed.
pub struct Scanner {
    finders: [Finder<'static>; 5],
    cache: [Option<Option<usize>>; 5],
}

impl Scanner {
    pub fn new(delimiter: char) -> Self {
        let mut buf = [0u8; 4];
        let delimiter = delimiter.encode_utf8(&mut buf);
        Self {
            finders: [
                Finder::new(delimiter.as_bytes()).into_owned(),
                Finder::new(START_REPEAT),
                Finder::new(START_INCLUDEIF),
                Finder::new(START_STRIP),
                Finder::new(END_STRIP),
            ],
            cache: [None; 5],
        }
    }

    /// Forget every cached position.
    pub fn invalidate(&mut self) {
        self.cache = [None; 5];
    }

    /// Update cached positions after `input[from..edited_end]` was rewritten.
    ///
    /// Text from `edited_end` on must be unchanged and unshifted. Only the
    /// edited span (plus a needle's length past it) is searched again.
    pub fn rescan(&mut self, input: &str, from: usize, edited_end: usize) {
        for kind in DirectiveKind::ALL {
            let index = kind.index();
            let needle = self.finders[index].needle().len();
            self.cache[index] = match self.cache[index] {
                Some(Some(pos)) if pos >= edited_end => {
                    let end = (pos + needle).min(input.len());
                    Some(Some(self.find(input, from, end, kind).unwrap_or(pos)))
                }
                Some(None) => {
                    let end = (edited_end + needle).min(input.len());
                    Some(self.find(input, from, end, kind))
                }
                _ => None,
            };
        }
    }

    /// The offset and kind of the first directive at or after `from`.
    pub fn next(&mut self, input: &str, from: usize) -> Option<(usize, DirectiveKind)> {
        let mut best: Option<(usize, DirectiveKind)> = None;
        for kind in DirectiveKind::ALL {
            if let Some(pos) = self.position(input, from, kind) {
                if best.map_or(true, |(best_pos, _)| pos < best_pos) {
                    best = Some((pos, kind));
                }
            }
        }
        best
    }

    fn position(&mut self, input: &str, from: usize, kind: DirectiveKind) -> Option<usize> {
        match self.cache[kind.index()] {
            Some(Some(pos)) if pos >= from => return Some(pos),
            Some(None) => return None,
            _ => {}
        }
        let found = self.find(input, from, input.len(), kind);
        self.cache[kind.index()] = Some(found);
        found
    }

    /// First occurrence of `kind`'s needle lying entirely within `input[from..end]`.
    fn find(&self, input: &str, from: usize, end: usize, kind: DirectiveKind) -> Option<usize> {
        let haystack = input.as_bytes().get(from..end)?;
        self.finders[kind.index()].find(haystack).map(|pos| pos + from)
    }
}

/// At most `len` bytes from the start of `text`, cut back to a char boundary.
pub fn window(text: &str, len: usize) -> &str {
    if text.len() <= len {
        return text;
    }
    let mut end = len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Match `<delim>name<delim>` at the start of `text`, returning the name.
///
/// Names are 1 to 32 ASCII word characters, the first not a digit. When the
/// delimiter is itself a word character the longest valid name wins.
pub fn parse_variable(text: &str, delimiter: char) -> Option<&str> {
    let text = window(text, MAX_VARIABLE_NAME + delimiter.len_utf8() * 2);
    let rest = text.strip_prefix(delimiter)?;
    let bytes = rest.as_bytes();
    if !bytes.first().copied().is_some_and(is_name_start) {
        return None;
    }
    let run = bytes
        .iter()
        .take(MAX_VARIABLE_NAME)
        .take_while(|b| is_name_char(**b))
        .count();
    (1..=run)
        .rev()
        .find(|&len| rest[len..].starts_with(delimiter))
        .map(|len| &rest[..len])
}

/// Match `<!-- START REPEAT name -->` at the start of `text`.
pub fn parse_repeat(text: &str) -> Option<&str> {
    REPEAT_PATTERN
        .captures(window(text, REPEAT_WINDOW))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Match `<!-- START INCLUDEIF [!]name -->` at the start of `text`.
///
/// Returns the name and whether the condition is negated.
pub fn parse_include_if(text: &str) -> Option<(&str, bool)> {
    let caps = INCLUDEIF_PATTERN.captures(window(text, INCLUDEIF_WINDOW))?;
    let negated = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
    caps.get(2).map(|m| (m.as_str(), negated))
}

/// Bytes a strip marker at the start of `text` occupies.
///
/// A marker is consumed through its closing `-->` when that follows on the
/// same line shortly after the literal, so labelled markers such as
/// `<!-- START STRIP WHITESPACE 1 -->` leave nothing behind.
pub fn strip_marker_len(text: &str, literal: &str, fixed_len: usize) -> usize {
    let tail = window(&text[literal.len()..], STRIP_CLOSE_WINDOW);
    let line = tail.split('\n').next().unwrap_or_default();
    match line.find("-->") {
        Some(pos) if !line[..pos].contains('<') => literal.len() + pos + 3,
        _ => {
            let mut len = fixed_len.min(text.len());
            while !text.is_char_boundary(len) {
                len += 1;
            }
            len
        }
    }
}

/// The closing marker matching an INCLUDEIF start.
pub fn include_if_end(name: &str, negated: bool) -> String {
    format!("<!-- END INCLUDEIF {}{} -->", if negated { "!" } else { "" }, name)
}

/// The opening marker of an INCLUDEIF, as it must appear in the input.
pub fn include_if_start(name: &str, negated: bool) -> String {
    format!("<!-- START INCLUDEIF {}{} -->", if negated { "!" } else { "" }, name)
}

/// The opening marker of a repeat block.
pub fn repeat_start(name: &str) -> String {
    format!("<!-- START REPEAT {} -->", name)
}

/// The closing marker of a repeat block.
pub fn repeat_end(name: &str) -> String {
    format!("<!-- END REPEAT {} -->", name)
}
