//! Cursor positions in a line-based view.
//!
//! A `Position` is a zero-based line index plus a column. Columns count
//! characters (Unicode scalar values), not bytes, so they stay valid for
//! lines containing multi-byte text. The helpers in this module convert
//! between columns and the byte offsets the marker grammar reports.
//!
//! # Example
//!
//! ```
//! use footquill::editor::cursor::{byte_to_col, col_to_byte, Position};
//!
//! let pos = Position::new(2, 4);
//! assert_eq!(format!("{}", pos), "3:5");
//!
//! let line = "café[^1]";
//! assert_eq!(byte_to_col(line, 5), 4);
//! assert_eq!(col_to_byte(line, 4), 5);
//! ```

use std::fmt;

/// A cursor position: line and character column, both zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    /// Creates a new position.
    pub const fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

impl fmt::Display for Position {
    /// One-based `line:column`, as shown to users.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.ch + 1)
    }
}

/// Converts a byte offset in `line` to a character column.
pub fn byte_to_col(line: &str, byte: usize) -> usize {
    line[..byte.min(line.len())].chars().count()
}

/// Converts a character column in `line` to a byte offset.
///
/// Columns past the end of the line map to the line length.
pub fn col_to_byte(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(byte, _)| byte)
}

/// Number of characters in `line`.
pub fn line_width(line: &str) -> usize {
    line.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_past_end_clamps() {
        assert_eq!(col_to_byte("abc", 10), 3);
        assert_eq!(col_to_byte("", 0), 0);
    }

    #[test]
    fn test_positions_order_by_line_then_column() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(1, 1) < Position::new(1, 2));
    }
}
