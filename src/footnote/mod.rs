//! Footnote extraction and presentation.
//!
//! Footnotes are found with a lightweight marker grammar rather than a
//! Markdown parser. Everything in this module is a pure function of its
//! inputs and usable on its own for diagnostics tooling.
//!
//! # Modules
//!
//! - `patterns`: The `[^label]` / `[^label]:` grammar and numeric predicates
//! - `index`: Label → references/definition mapping
//! - `label`: Backreference text formatting
//! - `validate`: Advisory issues and their summary
//! - `suggest`: Label suggestions from content analysis
//!
//! # Example
//!
//! ```
//! use footquill::footnote::FootnoteIndex;
//!
//! let index = FootnoteIndex::build("Watch[^video] twice[^video].\n\n[^video]: def");
//! let entry = index.get("video").unwrap();
//! assert_eq!(entry.references.len(), 2);
//! assert_eq!(entry.definition, "def");
//! ```

pub mod index;
pub mod label;
pub mod patterns;
pub mod suggest;
pub mod validate;

pub use index::{build_index, FootnoteEntry, FootnoteIndex};
pub use suggest::suggest_labels;
pub use validate::{summarize, validate, Advisory, AdvisoryKind};
