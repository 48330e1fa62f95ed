#![forbid(unsafe_code)]

//! `<color>` markup parsing for frame lines.
//!
//! Frame artwork marks highlighted regions inline:
//!
//! ```text
//! plain <color>highlighted</color> plain
//! ```
//!
//! Regions do not nest and there is no escape for a literal tag. A line is
//! split into an ordered list of [`TextSpan`]s whose contents, concatenated,
//! equal the line with the matched delimiters removed.
//!
//! # Malformed input
//!
//! Markup errors are recovered, never reported, and no text is ever dropped:
//!
//! - A `<color>` with no closing `</color>` later on the line turns the rest
//!   of the line, tag included, into plain literal text.
//! - A `</color>` outside any region is plain literal text.
//!
//! # Example
//! ```
//! use reel_render::markup::{TextSpan, parse_line};
//!
//! let spans = parse_line("a<color>b</color>c");
//! assert_eq!(
//!     spans.as_slice(),
//!     &[TextSpan::plain("a"), TextSpan::highlighted("b"), TextSpan::plain("c")]
//! );
//! ```

use memchr::memmem;
use smallvec::SmallVec;

/// Opening delimiter of a highlighted region.
pub const OPEN_TAG: &str = "<color>";

/// Closing delimiter of a highlighted region.
pub const CLOSE_TAG: &str = "</color>";

/// Spans of one line. Most art lines have at most one highlighted region.
pub type Spans = SmallVec<[TextSpan; 3]>;

/// A contiguous run of characters sharing one highlight state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// The visible characters.
    pub content: String,
    /// Whether the run is wrapped in the highlight color.
    pub highlighted: bool,
}

impl TextSpan {
    /// A plain (unhighlighted) span.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            highlighted: false,
        }
    }

    /// A highlighted span.
    pub fn highlighted(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            highlighted: true,
        }
    }
}

/// Split one line into spans.
///
/// Empty spans are omitted and neighbouring plain runs are merged, so
/// `"a<color></color>b"` yields a single plain span `"ab"`.
#[must_use]
pub fn parse_line(line: &str) -> Spans {
    let mut spans = Spans::new();
    let mut rest = line;

    while !rest.is_empty() {
        let Some(open) = memmem::find(rest.as_bytes(), OPEN_TAG.as_bytes()) else {
            push_plain(&mut spans, rest);
            break;
        };
        let inner = &rest[open + OPEN_TAG.len()..];
        let Some(close) = memmem::find(inner.as_bytes(), CLOSE_TAG.as_bytes()) else {
            // Unterminated: everything from here on is literal.
            push_plain(&mut spans, rest);
            break;
        };

        push_plain(&mut spans, &rest[..open]);
        push_highlighted(&mut spans, &inner[..close]);
        rest = &inner[close + CLOSE_TAG.len()..];
    }

    spans
}

/// Concatenate span contents, ignoring highlight state.
#[must_use]
pub fn plain_text(spans: &[TextSpan]) -> String {
    spans.iter().map(|span| span.content.as_str()).collect()
}

fn push_plain(spans: &mut Spans, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if !last.highlighted => last.content.push_str(text),
        _ => spans.push(TextSpan::plain(text)),
    }
}

fn push_highlighted(spans: &mut Spans, text: &str) {
    if !text.is_empty() {
        spans.push(TextSpan::highlighted(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Vec<TextSpan> {
        parse_line(line).into_vec()
    }

    #[test]
    fn plain_line_is_one_span() {
        assert_eq!(parse("  __/  \\__  "), vec![TextSpan::plain("  __/  \\__  ")]);
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn highlighted_region_in_middle() {
        assert_eq!(
            parse("a<color>b</color>c"),
            vec![
                TextSpan::plain("a"),
                TextSpan::highlighted("b"),
                TextSpan::plain("c"),
            ]
        );
    }

    #[test]
    fn several_regions() {
        assert_eq!(
            parse("<color>x</color>-<color>yy</color>"),
            vec![
                TextSpan::highlighted("x"),
                TextSpan::plain("-"),
                TextSpan::highlighted("yy"),
            ]
        );
    }

    #[test]
    fn adjacent_regions_stay_separate() {
        assert_eq!(
            parse("<color>a</color><color>b</color>"),
            vec![TextSpan::highlighted("a"), TextSpan::highlighted("b")]
        );
    }

    #[test]
    fn empty_region_is_omitted_and_plain_merges() {
        assert_eq!(parse("a<color></color>b"), vec![TextSpan::plain("ab")]);
        assert!(parse("<color></color>").is_empty());
    }

    #[test]
    fn unterminated_tag_is_literal() {
        assert_eq!(parse("<color>b"), vec![TextSpan::plain("<color>b")]);
    }

    #[test]
    fn unterminated_tag_after_region_keeps_trailing_text() {
        assert_eq!(
            parse("<color>a</color> b <color>c"),
            vec![TextSpan::highlighted("a"), TextSpan::plain(" b <color>c")]
        );
    }

    #[test]
    fn stray_close_tag_is_literal() {
        assert_eq!(parse("a</color>b"), vec![TextSpan::plain("a</color>b")]);
    }

    #[test]
    fn open_tag_inside_region_is_not_nested() {
        assert_eq!(
            parse("<color>a<color>b</color>c"),
            vec![TextSpan::highlighted("a<color>b"), TextSpan::plain("c")]
        );
    }

    #[test]
    fn multibyte_content_survives() {
        assert_eq!(
            parse("░▒<color>▓█</color>▒░"),
            vec![
                TextSpan::plain("░▒"),
                TextSpan::highlighted("▓█"),
                TextSpan::plain("▒░"),
            ]
        );
    }

    #[test]
    fn plain_text_joins_contents() {
        let spans = parse_line("x<color>y</color>z");
        assert_eq!(plain_text(&spans), "xyz");
    }
}
