//! The directive scanner and substitution engine.
//!
//! A [`RenderPass`] walks its input once. Plain text is copied to the output,
//! and each directive the [`Scanner`] finds is consumed by its handler. All
//! scan state (cursor, output, strip markers) belongs to the pass, so a pass
//! is used for exactly one render.

use std::borrow::Cow;

use tracing::{debug, trace, warn};

use crate::context::DataContext;
use crate::directive::{
    self, Directive, DirectiveKind, Scanner, END_STRIP, END_STRIP_LEN, INCLUDEIF_WINDOW,
    REPEAT_WINDOW, START_STRIP, START_STRIP_LEN,
};
use crate::error::ScanWarning;
use crate::strip::{self, StripMarker};

/// Result of scanning plus strip resolution, before cleanup and translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassOutput {
    pub text: String,
    pub warnings: Vec<ScanWarning>,
}

/// One single-use render of a piece of template text.
pub struct RenderPass<'t> {
    delimiter: char,
    /// Input being scanned. Borrowed until a kept INCLUDEIF block needs to edit it;
    /// text before `cursor` is consumed and may be overwritten.
    input: Cow<'t, str>,
    cursor: usize,
    output: String,
    markers: Vec<StripMarker>,
    warnings: Vec<ScanWarning>,
    scanner: Scanner,
}

impl<'t> RenderPass<'t> {
    pub fn new(input: &'t str, delimiter: char) -> Self {
        Self {
            delimiter,
            input: Cow::Borrowed(input),
            cursor: 0,
            output: String::with_capacity(input.len()),
            markers: Vec::new(),
            warnings: Vec::new(),
            scanner: Scanner::new(delimiter),
        }
    }

    /// Scan the whole input against `data`, then resolve strip regions.
    pub fn run(mut self, data: &DataContext) -> PassOutput {
        trace!("Scanning {} bytes", self.input.len());

        while let Some((position, kind)) = self.scanner.next(&self.input, self.cursor) {
            self.output.push_str(&self.input[self.cursor..position]);
            self.cursor = position;

            match Directive::parse(kind, &self.input[position..], self.delimiter) {
                Some(found) => self.dispatch(found, data),
                None => self.malformed(kind),
            }
        }
        self.output.push_str(&self.input[self.cursor..]);

        let regions = strip::resolve_regions(&self.markers, self.output.len());
        if !regions.is_empty() {
            debug!("Stripping whitespace in {} region(s)", regions.len());
        }

        PassOutput {
            text: strip::apply(&self.output, &regions),
            warnings: self.warnings,
        }
    }

    fn dispatch(&mut self, found: Directive, data: &DataContext) {
        match found {
            Directive::Variable(name) => self.variable(&name, data),
            Directive::RepeatStart(name) => self.repeat(&name, data),
            Directive::IncludeIfStart { name, negated } => self.include_if(&name, negated, data),
            Directive::StripStart => {
                self.markers.push(StripMarker::Start(self.output.len()));
                self.cursor += directive::strip_marker_len(
                    &self.input[self.cursor..],
                    START_STRIP,
                    START_STRIP_LEN,
                );
            }
            Directive::StripEnd => {
                self.markers.push(StripMarker::End(self.output.len()));
                self.cursor +=
                    directive::strip_marker_len(&self.input[self.cursor..], END_STRIP, END_STRIP_LEN);
            }
        }
    }

    /// Text at the cursor looked like a directive but was not one.
    fn malformed(&mut self, kind: DirectiveKind) {
        match kind {
            DirectiveKind::Variable => {
                self.output.push(self.delimiter);
                self.cursor += self.delimiter.len_utf8();
            }
            DirectiveKind::Repeat => {
                let snippet = self.snippet(REPEAT_WINDOW);
                self.report(ScanWarning::MalformedRepeat {
                    offset: self.cursor,
                    snippet,
                });
                self.emit_literal_lt();
            }
            DirectiveKind::IncludeIf => {
                let snippet = self.snippet(INCLUDEIF_WINDOW);
                self.report(ScanWarning::MalformedIncludeIf {
                    offset: self.cursor,
                    snippet,
                });
                self.emit_literal_lt();
            }
            // Strip markers are recognised by their literal alone
            DirectiveKind::StripStart | DirectiveKind::StripEnd => {}
        }
    }

    fn variable(&mut self, name: &str, data: &DataContext) {
        let delimiter_len = self.delimiter.len_utf8();
        match data.text(name) {
            Some(value) => {
                self.output.push_str(&value);
                self.cursor += name.len() + delimiter_len * 2;
            }
            None => {
                // The closing delimiter stays in the input and may open the next variable
                self.report(ScanWarning::UnknownVariable {
                    offset: self.cursor,
                    name: name.to_string(),
                });
                self.output.push(self.delimiter);
                self.output.push_str(name);
                self.cursor += name.len() + delimiter_len;
            }
        }
    }

    fn repeat(&mut self, name: &str, data: &DataContext) {
        let Some(items) = data.sequence(name) else {
            self.report(ScanWarning::RepeatTargetMissing {
                offset: self.cursor,
                name: name.to_string(),
            });
            self.emit_literal_lt();
            return;
        };

        let body_start = self.cursor + directive::repeat_start(name).len();
        let end_marker = directive::repeat_end(name);
        let Some(body_end) = self.input[body_start..]
            .find(&end_marker)
            .map(|pos| pos + body_start)
        else {
            self.report(ScanWarning::RepeatEndMissing {
                offset: self.cursor,
                name: name.to_string(),
            });
            self.emit_literal_lt();
            return;
        };

        debug!("Repeating '{}' for {} item(s)", name, items.len());
        let body = &self.input[body_start..body_end];
        for item in items {
            let child = RenderPass::new(body, self.delimiter).run(item);
            self.output.push_str(&child.text);
            self.warnings.extend(child.warnings);
        }
        self.cursor = body_end + end_marker.len();
    }

    fn include_if(&mut self, name: &str, negated: bool, data: &DataContext) {
        let start_len = directive::include_if_start(name, negated).len();
        let end_marker = directive::include_if_end(name, negated);
        let search_from = self.cursor + start_len;
        let Some(end) = self.input[search_from..]
            .find(&end_marker)
            .map(|pos| pos + search_from)
        else {
            self.report(ScanWarning::IncludeIfEndMissing {
                offset: self.cursor,
                marker: end_marker,
            });
            self.emit_literal_lt();
            return;
        };

        let include = data.is_satisfied(name) != negated;
        trace!(
            "INCLUDEIF {}{} -> {}",
            if negated { "!" } else { "" },
            name,
            if include { "kept" } else { "removed" }
        );

        if include {
            self.keep_block(start_len, end, end_marker.len());
        } else {
            self.cursor = end + end_marker.len();
        }
    }

    /// Drop both markers of a kept block and continue scanning its body.
    ///
    /// The body is moved right over the end marker in a same-length splice, so
    /// it joins the text that followed the block while that text stays where
    /// it is. Only the consumed span before the new cursor is overwritten.
    fn keep_block(&mut self, start_len: usize, end: usize, end_len: usize) {
        let body_start = self.cursor + start_len;
        let edited_end = end + end_len;
        let resume = body_start + end_len;

        let input = self.input.to_mut();
        let mut splice = " ".repeat(resume - self.cursor);
        splice.push_str(&input[body_start..end]);
        input.replace_range(self.cursor..edited_end, &splice);

        self.scanner.rescan(input.as_str(), resume, edited_end);
        self.cursor = resume;
    }

    fn emit_literal_lt(&mut self) {
        self.output.push('<');
        self.cursor += 1;
    }

    fn snippet(&self, len: usize) -> String {
        directive::window(&self.input[self.cursor..], len).to_string()
    }

    fn report(&mut self, warning: ScanWarning) {
        match &warning {
            // Stray delimiters are common in ordinary text
            ScanWarning::UnknownVariable { .. } => debug!("{}", warning),
            _ => warn!("{}", warning),
        }
        self.warnings.push(warning);
    }
}
