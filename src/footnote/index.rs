//! Footnote index: label → references and definition for one document snapshot.
//!
//! The index is built in two passes over the raw text:
//!
//! 1. every marker that is not a definition marker is appended to its
//!    label's `references`, creating the entry on first sight;
//! 2. every definition marker sets its label's `definition` to the rest of
//!    its line, trimmed. A later definition of the same label replaces an
//!    earlier one, and a label that is only defined still gets an entry.
//!
//! Building is a pure function of the text. The index is never mutated after
//! [`FootnoteIndex::build`] returns; a new snapshot replaces it wholesale.

use super::patterns::markers;
use indexmap::IndexMap;
use serde::Serialize;

/// Everything known about one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FootnoteEntry {
    /// Raw text between `[^` and `]`, case-sensitive.
    pub label: String,
    /// Literal marker strings in scan order. Empty for a definition-only label.
    pub references: Vec<String>,
    /// Trimmed definition text. Empty when no definition was found.
    pub definition: String,
}

impl FootnoteEntry {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            references: Vec::new(),
            definition: String::new(),
        }
    }

    /// Whether the label is referenced but never defined.
    pub fn is_orphaned_reference(&self) -> bool {
        !self.references.is_empty() && self.definition.is_empty()
    }

    /// Whether the label is defined but never referenced.
    pub fn is_unused_definition(&self) -> bool {
        self.references.is_empty() && !self.definition.is_empty()
    }
}

/// Label → entry mapping in first-sight order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FootnoteIndex {
    entries: IndexMap<String, FootnoteEntry>,
}

impl FootnoteIndex {
    /// Scans `text` for references and definitions.
    ///
    /// # Example
    ///
    /// ```
    /// use footquill::footnote::FootnoteIndex;
    ///
    /// let index = FootnoteIndex::build("A[^1] B[^2]\n\n[^1]: first\n[^2]: second");
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.get("1").unwrap().definition, "first");
    /// assert_eq!(index.get("2").unwrap().references, vec!["[^2]"]);
    /// ```
    pub fn build(text: &str) -> Self {
        let mut entries: IndexMap<String, FootnoteEntry> = IndexMap::new();

        for marker in markers(text).filter(|m| !m.is_definition) {
            entries
                .entry(marker.label.to_string())
                .or_insert_with(|| FootnoteEntry::new(marker.label))
                .references
                .push(text[marker.start..marker.end].to_string());
        }

        for marker in markers(text).filter(|m| m.is_definition) {
            let rest = &text[marker.end..];
            let line = match rest.find('\n') {
                Some(newline) => &rest[..newline],
                None => rest,
            };
            entries
                .entry(marker.label.to_string())
                .or_insert_with(|| FootnoteEntry::new(marker.label))
                .definition = line.trim().to_string();
        }

        Self { entries }
    }

    /// Looks up a label.
    pub fn get(&self, label: &str) -> Option<&FootnoteEntry> {
        self.entries.get(label)
    }

    /// Looks up a label among the first `limit` entries only.
    ///
    /// Used to bound work on very large documents without copying the index.
    pub fn get_within(&self, label: &str, limit: Option<usize>) -> Option<&FootnoteEntry> {
        let (position, _, entry) = self.entries.get_full(label)?;
        match limit {
            Some(limit) if position >= limit => None,
            _ => Some(entry),
        }
    }

    /// Returns true if the label has an entry.
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Returns the number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no footnotes were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in first-sight order.
    pub fn iter(&self) -> impl Iterator<Item = &FootnoteEntry> {
        self.entries.values()
    }

    /// Iterates over labels in first-sight order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Builds the footnote index for `text`. See [`FootnoteIndex::build`].
pub fn build_index(text: &str) -> FootnoteIndex {
    FootnoteIndex::build(text)
}
