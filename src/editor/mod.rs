//! Editable views of a Markdown document.
//!
//! # Modules
//!
//! - `mode`: Source vs. preview view mode
//! - `cursor`: Line/column positions and column ↔ byte conversion
//! - `buffer`: The `EditableView` trait and an in-memory `TextBuffer`
//!
//! # Example
//!
//! ```
//! use footquill::editor::buffer::{EditableView, TextBuffer};
//! use footquill::editor::cursor::Position;
//!
//! let buffer = TextBuffer::from_text("A[^1]\n\n[^1]: note").with_cursor(Position::new(2, 3));
//! assert_eq!(buffer.cursor(), Position::new(2, 3));
//! assert!(buffer.mode().is_source());
//! ```

pub mod buffer;
pub mod cursor;
pub mod mode;
