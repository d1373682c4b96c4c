//! Rendered backreference elements.
//!
//! The synchronizer never sees the host's concrete element type. It only
//! needs the capability set of [`BackrefElement`]: read the navigation
//! target, read and set the processed flag, and replace the visible content.

use crate::config::Config;
use crate::footnote::label::escape_html;
use crate::footnote::FootnoteEntry;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#fnref:(.+)$").expect("valid backreference target regex"));

/// Attribute a DOM host sets to mark an element as processed.
pub const PROCESSED_ATTRIBUTE: &str = "data-custom-backref";

/// Class of the span holding rewritten backreference text.
pub const CONTENT_CLASS: &str = "custom-backref-text";

/// Text of a backreference before it is rewritten.
pub const DEFAULT_BACKREF_TEXT: &str = "↩︎";

/// Errors a host may report while replacing an element's content.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The element is no longer attached to the rendered view.
    #[error("backreference element is detached from the rendered view")]
    Detached,

    /// The host refused the content.
    #[error("host rejected backreference content: {0}")]
    Rejected(String),
}

/// Replacement content for one backreference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackrefContent {
    /// Text from the label formatter.
    pub text: String,
    /// `text` is markup (`<sup>..</sup>`) rather than plain text.
    pub is_markup: bool,
    /// Tooltip for the link, when tooltips are enabled.
    pub tooltip: Option<String>,
    /// Whether the host should underline the text on hover.
    pub hover: bool,
    /// CSS class for the content span.
    pub class: &'static str,
}

impl BackrefContent {
    /// Builds the content for `entry` under `config`.
    pub fn for_entry(entry: &FootnoteEntry, config: &Config) -> Self {
        Self {
            text: crate::footnote::label::format(entry, config),
            is_markup: config.display_style == crate::config::DisplayStyle::Superscript,
            tooltip: config
                .show_tooltips
                .then(|| format!("Back to footnote: {}", entry.label)),
            hover: config.enable_hover_effects,
            class: CONTENT_CLASS,
        }
    }
}

/// Capabilities the synchronizer needs from a rendered backreference.
pub trait BackrefElement {
    /// The navigation attribute (an `href` such as `#fnref:1`), if present.
    fn navigation_target(&self) -> Option<&str>;

    /// Whether the element was already rewritten.
    fn is_processed(&self) -> bool;

    /// Marks the element as rewritten.
    fn mark_processed(&mut self);

    /// Replaces the visible content, leaving the navigation target intact.
    fn set_visible_content(&mut self, content: BackrefContent) -> Result<(), RenderError>;
}

/// Extracts the label from a `#fnref:<label>` navigation target.
///
/// # Example
///
/// ```
/// use footquill::sync::element::target_label;
///
/// assert_eq!(target_label("#fnref:video"), Some("video"));
/// assert_eq!(target_label("note.md#fnref:1"), Some("1"));
/// assert_eq!(target_label("#fn:1"), None);
/// ```
pub fn target_label(href: &str) -> Option<&str> {
    TARGET_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// In-memory backreference element.
///
/// Stands in for a DOM `a.footnote-backref` node in the command-line host
/// and in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBackref {
    href: Option<String>,
    content: Option<BackrefContent>,
    processed: bool,
}

impl RenderedBackref {
    /// Creates an unprocessed element pointing at `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            content: None,
            processed: false,
        }
    }

    /// Creates an element without a navigation attribute.
    pub fn without_target() -> Self {
        Self {
            href: None,
            content: None,
            processed: false,
        }
    }

    /// Creates the element a renderer emits for `label`.
    pub fn for_label(label: &str) -> Self {
        Self::new(format!("#fnref:{}", label))
    }

    /// The visible text.
    pub fn text(&self) -> &str {
        self.content
            .as_ref()
            .map_or(DEFAULT_BACKREF_TEXT, |c| c.text.as_str())
    }

    /// The replaced content, if the element was rewritten.
    pub fn content(&self) -> Option<&BackrefContent> {
        self.content.as_ref()
    }

    /// Renders the element as an HTML anchor.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<a class=\"footnote-backref\"");
        if let Some(href) = &self.href {
            html.push_str(&format!(" href=\"{}\"", escape_html(href)));
        }
        if self.processed {
            html.push_str(&format!(" {}=\"true\"", PROCESSED_ATTRIBUTE));
        }
        match &self.content {
            Some(content) => {
                if let Some(tooltip) = &content.tooltip {
                    html.push_str(&format!(" title=\"{}\"", escape_html(tooltip)));
                }
                let body = if content.is_markup {
                    content.text.clone()
                } else {
                    escape_html(&content.text)
                };
                html.push_str(&format!(
                    "><span class=\"{}\">{}</span></a>",
                    content.class, body
                ));
            }
            None => html.push_str(&format!(">{}</a>", DEFAULT_BACKREF_TEXT)),
        }
        html
    }
}

impl fmt::Display for RenderedBackref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_html())
    }
}

impl BackrefElement for RenderedBackref {
    fn navigation_target(&self) -> Option<&str> {
        self.href.as_deref()
    }

    fn is_processed(&self) -> bool {
        self.processed
    }

    fn mark_processed(&mut self) {
        self.processed = true;
    }

    fn set_visible_content(&mut self, content: BackrefContent) -> Result<(), RenderError> {
        self.content = Some(content);
        Ok(())
    }
}
