//! Advisory validation of a document's footnotes.
//!
//! Malformed footnotes are data, not errors: this pass only reports them so a
//! user-invoked check can print a short summary.

use super::index::FootnoteIndex;
use super::patterns::markers;
use crate::config::Config;
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static VALID_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid label format regex"));

/// What is wrong with a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryKind {
    /// Referenced, never defined.
    OrphanedReference,
    /// Defined, never referenced.
    UnusedDefinition,
    /// Defined more than once; carries the number of definitions.
    DuplicateDefinition(usize),
    /// Label contains characters outside `[A-Za-z0-9_-]`.
    InvalidLabel,
}

/// One advisory issue for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub label: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = &self.label;
        match self.kind {
            AdvisoryKind::OrphanedReference => {
                write!(f, "Orphaned reference: [^{}] has no definition", label)
            }
            AdvisoryKind::UnusedDefinition => {
                write!(f, "Unused definition: [^{}]: has no references", label)
            }
            AdvisoryKind::DuplicateDefinition(count) => {
                write!(f, "Duplicate definition: [^{}]: is defined {} times", label, count)
            }
            AdvisoryKind::InvalidLabel => write!(
                f,
                "Invalid label format: [^{}] contains special characters",
                label
            ),
        }
    }
}

/// Counts definition markers per label.
fn definition_counts(text: &str) -> IndexMap<&str, usize> {
    let mut counts = IndexMap::new();
    for marker in markers(text).filter(|m| m.is_definition) {
        *counts.entry(marker.label).or_insert(0) += 1;
    }
    counts
}

/// Reports advisory issues for every label in `index`.
///
/// `text` must be the text the index was built from; it is rescanned for
/// duplicate definitions, which the index itself collapses.
///
/// # Example
///
/// ```
/// use footquill::config::Config;
/// use footquill::footnote::{validate, FootnoteIndex};
///
/// let text = "See [^9].";
/// let issues = validate(text, &FootnoteIndex::build(text), &Config::default());
/// assert_eq!(issues[0].to_string(), "Orphaned reference: [^9] has no definition");
/// ```
pub fn validate(text: &str, index: &FootnoteIndex, config: &Config) -> Vec<Advisory> {
    let counts = if config.enable_duplicate_detection {
        definition_counts(text)
    } else {
        IndexMap::new()
    };

    let mut issues = Vec::new();
    for entry in index.iter() {
        let mut push = |kind| {
            issues.push(Advisory {
                kind,
                label: entry.label.clone(),
            })
        };

        if config.enable_orphan_detection {
            if entry.is_orphaned_reference() {
                push(AdvisoryKind::OrphanedReference);
            }
            if entry.is_unused_definition() {
                push(AdvisoryKind::UnusedDefinition);
            }
        }
        if let Some(&count) = counts.get(entry.label.as_str()) {
            if count > 1 {
                push(AdvisoryKind::DuplicateDefinition(count));
            }
        }
        if config.enable_label_validation && !VALID_LABEL_RE.is_match(&entry.label) {
            push(AdvisoryKind::InvalidLabel);
        }
    }
    issues
}

/// Short human-readable summary for a user-invoked check.
pub fn summarize(issues: &[Advisory]) -> String {
    if issues.is_empty() {
        return "No footnote issues found".to_string();
    }

    let mut summary = format!(
        "{} footnote issue{} found",
        issues.len(),
        if issues.len() == 1 { "" } else { "s" }
    );
    for issue in issues {
        summary.push_str("\n- ");
        summary.push_str(&issue.to_string());
    }
    summary
}
