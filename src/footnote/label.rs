//! Backreference label formatting.
//!
//! Turns one footnote's label into the text shown on its "return to
//! reference" link. First a label policy picks the base text, then the
//! display style decorates it.

use super::index::FootnoteEntry;
use super::patterns::contains_digit;
use crate::config::{Config, DisplayStyle, LabelPriority};

/// Strips everything but ASCII alphanumerics, `_`, `-` and whitespace.
///
/// Falls back to the original label when nothing would remain, so the
/// result is never empty for a non-empty label.
///
/// # Example
///
/// ```
/// use footquill::footnote::label::clean_label;
///
/// assert_eq!(clean_label("my.note!"), "mynote");
/// assert_eq!(clean_label("***"), "***");
/// ```
pub fn clean_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        label.to_string()
    } else {
        cleaned
    }
}

/// Picks the undecorated text for a label.
fn base_text(label: &str, config: &Config) -> String {
    if config.show_both_label_and_number {
        return format!("[{}]", label);
    }

    match config.label_priority {
        LabelPriority::Label => clean_label(label),
        LabelPriority::Number if contains_digit(label) => label.to_string(),
        LabelPriority::Number => clean_label(label),
        LabelPriority::Auto if contains_digit(label) => format!("[{}]", label),
        LabelPriority::Auto => clean_label(label),
    }
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Applies the configured display style to already chosen text.
///
/// The superscript style returns markup; only the `<sup>` wrapper is live,
/// the text inside it is escaped.
pub fn apply_display_style(text: &str, config: &Config) -> String {
    match config.display_style {
        DisplayStyle::Emoji => format!("{} {}", config.custom_emoji, text),
        DisplayStyle::Superscript => format!("<sup>{}</sup>", escape_html(text)),
        DisplayStyle::Plain => text.to_string(),
        DisplayStyle::Brackets if text.starts_with('[') => text.to_string(),
        DisplayStyle::Brackets => format!("[{}]", text),
    }
}

/// Returns the backreference text for `entry`.
///
/// # Example
///
/// ```
/// use footquill::config::{Config, DisplayStyle};
/// use footquill::footnote::{label::format, FootnoteIndex};
///
/// let index = FootnoteIndex::build("a[^1] b[^video]");
/// let config = Config::default();
/// assert_eq!(format(index.get("1").unwrap(), &config), "[1]");
/// assert_eq!(format(index.get("video").unwrap(), &config), "[video]");
///
/// let plain = Config { display_style: DisplayStyle::Plain, ..Config::default() };
/// assert_eq!(format(index.get("video").unwrap(), &plain), "video");
/// ```
pub fn format(entry: &FootnoteEntry, config: &Config) -> String {
    apply_display_style(&base_text(&entry.label, config), config)
}
