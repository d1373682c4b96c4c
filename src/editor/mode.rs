//! View mode of an editable document view.
//!
//! Navigation only operates on raw Markdown, so the navigator checks the
//! mode before touching the view.
//!
//! # Example
//!
//! ```
//! use footquill::editor::mode::ViewMode;
//!
//! let mode = ViewMode::default();
//! assert_eq!(mode, ViewMode::Source);
//! assert_eq!(format!("{}", ViewMode::Preview), "PREVIEW");
//! ```

use std::fmt;

/// Whether a view shows raw source or rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Raw Markdown editing.
    #[default]
    Source,
    /// Rendered, read-only output.
    Preview,
}

impl ViewMode {
    /// Returns true when the view accepts raw text edits.
    pub fn is_source(self) -> bool {
        self == ViewMode::Source
    }
}

impl fmt::Display for ViewMode {
    /// Formats the mode as an uppercase string suitable for a status line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Source => write!(f, "SOURCE"),
            ViewMode::Preview => write!(f, "PREVIEW"),
        }
    }
}
