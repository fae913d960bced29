//! Whitespace-strip regions.
//!
//! While scanning, each strip marker records the output length at the point it
//! was met. After scanning, [`resolve_regions`] pairs the markers into
//! non-overlapping ranges and [`apply`] collapses the whitespace inside them.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

static INTER_TAG_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r">(?-u:\s)+<").unwrap());

/// A recorded region boundary, as an offset into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripMarker {
    Start(usize),
    End(usize),
}

impl StripMarker {
    /// Signed form: positive offsets start a region, negative offsets end one.
    pub fn as_signed(&self) -> i64 {
        match *self {
            StripMarker::Start(offset) => offset as i64,
            StripMarker::End(offset) => -(offset as i64),
        }
    }
}

/// Pair markers into ordered, non-overlapping ranges of an output of `output_len` bytes.
///
/// A start while another is open is ignored, an end with nothing open is
/// dropped, and a start still open at the end runs to the end of the output.
pub fn resolve_regions(markers: &[StripMarker], output_len: usize) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut open: Option<usize> = None;

    for marker in markers {
        match (*marker, open) {
            (StripMarker::Start(start), None) => open = Some(start),
            (StripMarker::Start(_), Some(_)) => {}
            (StripMarker::End(end), Some(start)) => {
                regions.push(start..end.max(start));
                open = None;
            }
            (StripMarker::End(_), None) => {}
        }
    }

    if let Some(start) = open {
        regions.push(start..output_len.max(start));
    }

    regions
}

/// Collapse inter-tag whitespace and trim the edges of each region.
pub fn apply(output: &str, regions: &[Range<usize>]) -> String {
    if regions.is_empty() {
        return output.to_string();
    }

    let mut stripped = String::with_capacity(output.len());
    let mut position = 0;
    for region in regions {
        let start = region.start.clamp(position, output.len());
        let end = region.end.clamp(start, output.len());
        stripped.push_str(&output[position..start]);
        stripped.push_str(
            strip_whitespace(&output[start..end]).trim_matches(|c: char| c.is_ascii_whitespace()),
        );
        position = end;
    }
    stripped.push_str(&output[position..]);
    stripped
}

/// Replace every ASCII whitespace run between `>` and `<` with nothing.
pub fn strip_whitespace(text: &str) -> String {
    INTER_TAG_WHITESPACE.replace_all(text, "><").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use StripMarker::{End, Start};

    #[test]
    fn test_resolve_simple_pair() {
        assert_eq!(resolve_regions(&[Start(2), End(8)], 10), vec![2..8]);
    }

    #[test]
    fn test_resolve_no_markers() {
        assert!(resolve_regions(&[], 10).is_empty());
    }

    #[test]
    fn test_resolve_second_start_is_ignored() {
        assert_eq!(resolve_regions(&[Start(1), Start(4), End(6)], 10), vec![1..6]);
    }

    #[test]
    fn test_resolve_orphan_end_is_dropped() {
        assert_eq!(resolve_regions(&[End(3), Start(4), End(6), End(9)], 10), vec![4..6]);
    }

    #[test]
    fn test_resolve_unterminated_start_runs_to_end() {
        assert_eq!(resolve_regions(&[Start(1), End(3), Start(5)], 10), vec![1..3, 5..10]);
    }

    #[test]
    fn test_signed_form() {
        assert_eq!(Start(5).as_signed(), 5);
        assert_eq!(End(5).as_signed(), -5);
    }

    #[test]
    fn test_strip_whitespace_between_tags() {
        assert_eq!(strip_whitespace("<a>  \n<b> x </b>\n</a>"), "<a><b> x </b></a>");
    }

    #[test]
    fn test_no_break_space_is_content() {
        assert_eq!(strip_whitespace("<td>\u{a0}</td>\n<td>"), "<td>\u{a0}</td><td>");
        assert_eq!(strip_whitespace("<b>\u{a0}<i>"), "<b>\u{a0}<i>");

        let output = "\u{a0}<p>x</p> \u{a0}";
        assert_eq!(apply(output, &[0..output.len()]), output);
        assert_eq!(apply(" \u{a0} ", &[0..4]), "\u{a0}");
    }

    #[test]
    fn test_apply_only_touches_regions() {
        let output = "<p>\n</p>|\n<div>\n  <p>x</p>\n</div>\n|<p>\n</p>";
        let start = output.find('|').unwrap() + 1;
        let end = output.rfind('|').unwrap();
        assert_eq!(
            apply(output, &[start..end]),
            "<p>\n</p>|<div><p>x</p></div>|<p>\n</p>"
        );
    }

    #[test]
    fn test_apply_without_regions_is_noop() {
        assert_eq!(apply(" <a> </a> ", &[]), " <a> </a> ");
    }
}
