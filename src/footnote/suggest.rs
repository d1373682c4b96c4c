//! Label suggestions from content analysis.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

const COMMON_LABELS: &[&str] = &[
    "video",
    "source",
    "quote",
    "stats",
    "methodology",
    "results",
    "discussion",
    "background",
    "context",
    "approach",
    "findings",
    "analysis",
    "conclusion",
    "api",
    "code",
    "docs",
    "tutorial",
    "example",
    "reference",
    "citation",
];

/// Topic groups: any trigger substring in the raw text suggests the labels.
const TOPICS: &[(&[&str], &[&str])] = &[
    (&["research", "study"], &["methodology", "results", "discussion"]),
    (&["video", "tutorial"], &["video", "tutorial", "demo"]),
    (&["code", "programming"], &["code", "api", "docs"]),
];

const MAX_SUGGESTIONS: usize = 10;

/// Suggests footnote labels for `content`.
///
/// Frequent vocabulary words come first, then topic groups. Topic triggers
/// are matched case-sensitively against the raw text.
///
/// # Example
///
/// ```
/// use footquill::footnote::suggest_labels;
///
/// let labels = suggest_labels("This tutorial shows the code.");
/// assert_eq!(labels, vec!["video", "tutorial", "demo", "code", "api", "docs"]);
/// ```
pub fn suggest_labels(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    let mut frequency: IndexMap<&str, usize> = IndexMap::new();
    for word in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
        if word.chars().count() > 3 {
            *frequency.entry(word).or_insert(0) += 1;
        }
    }

    let mut suggestions: Vec<&str> = frequency
        .iter()
        .filter(|&(word, &count)| count > 2 && COMMON_LABELS.contains(word))
        .map(|(word, _)| *word)
        .collect();

    for (triggers, labels) in TOPICS {
        if triggers.iter().any(|t| content.contains(t)) {
            suggestions.extend_from_slice(labels);
        }
    }

    let mut unique: Vec<String> = Vec::new();
    for label in suggestions {
        if !unique.iter().any(|u| u == label) {
            unique.push(label.to_string());
        }
    }
    unique.truncate(MAX_SUGGESTIONS);
    unique
}
