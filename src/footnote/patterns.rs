//! Marker grammar shared by the index builder and the cursor navigator.
//!
//! A marker is `[^label]` where the label is one or more characters other
//! than `]`. A marker immediately followed by `:` is a definition marker.
//! All offsets are byte offsets into the scanned text.

use regex::Regex;
use std::sync::LazyLock;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^([^\]]+)\]").expect("valid footnote marker regex"));

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit run regex"));

/// One marker occurrence in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    /// The text between `[^` and `]`.
    pub label: &'a str,
    /// Byte offset of the opening `[`.
    pub start: usize,
    /// Byte offset just past the closing `]`, or past the `:` for definitions.
    pub end: usize,
    /// Whether the marker is followed by `:`.
    pub is_definition: bool,
}

impl Marker<'_> {
    /// Returns the literal `[^label]` text, without the definition colon.
    pub fn marker_text(&self) -> String {
        format!("[^{}]", self.label)
    }

    /// Byte offset just past the closing `]`, ignoring a definition colon.
    pub fn marker_end(&self) -> usize {
        if self.is_definition {
            self.end - 1
        } else {
            self.end
        }
    }
}

/// Iterates over every non-overlapping marker in `text`, left to right.
///
/// # Example
///
/// ```
/// use footquill::footnote::patterns::markers;
///
/// let found: Vec<_> = markers("A[^1] B\n[^1]: one").collect();
/// assert_eq!(found.len(), 2);
/// assert!(!found[0].is_definition);
/// assert!(found[1].is_definition);
/// assert_eq!(found[1].end, 13);
/// ```
pub fn markers(text: &str) -> impl Iterator<Item = Marker<'_>> {
    MARKER_RE.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let label = caps.get(1)?.as_str();
        let is_definition = text[whole.end()..].starts_with(':');
        let end = if is_definition {
            whole.end() + 1
        } else {
            whole.end()
        };
        Some(Marker {
            label,
            start: whole.start(),
            end,
            is_definition,
        })
    })
}

/// Returns the first definition marker in `line`, if any.
pub fn find_definition(line: &str) -> Option<Marker<'_>> {
    markers(line).find(|m| m.is_definition)
}

/// Loose numeric test: the label contains at least one ASCII digit.
///
/// `v1deo` counts as numeric here. Formatting relies on this quirk, so it is
/// kept apart from [`parse_numeric_label`].
pub fn contains_digit(label: &str) -> bool {
    DIGITS_RE.is_match(label)
}

/// The first run of ASCII digits in `text`, parsed as a number.
pub fn numeric_token(text: &str) -> Option<u64> {
    DIGITS_RE.find(text)?.as_str().parse().ok()
}

/// Strict numeric test: the whole label (ignoring surrounding whitespace)
/// is a base-10 integer.
pub fn parse_numeric_label(label: &str) -> Option<u64> {
    let trimmed = label.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
