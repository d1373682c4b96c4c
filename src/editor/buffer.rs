//! Editable views and an in-memory line buffer.
//!
//! [`EditableView`] is what the cursor navigator needs from a host editor:
//! the cursor, line access, a whole-line replace and an append at the end
//! of the document. [`TextBuffer`] implements it over a `Vec<String>` for the
//! command-line host and tests.

use super::cursor::{line_width, Position};
use super::mode::ViewMode;

/// Line-based access to the focused document in a host editor.
pub trait EditableView {
    /// Current view mode.
    fn mode(&self) -> ViewMode;

    /// Current cursor position.
    fn cursor(&self) -> Position;

    /// Moves the cursor.
    fn set_cursor(&mut self, pos: Position);

    /// Text of line `index`, without its line break. Empty past the end.
    fn line(&self, index: usize) -> String;

    /// Number of lines; an empty document has one empty line.
    fn line_count(&self) -> usize;

    /// Replaces the full text of line `index`.
    fn replace_line(&mut self, index: usize, text: &str);

    /// Inserts `text` at the very end of the document. `text` may contain
    /// line breaks.
    fn append(&mut self, text: &str);

    /// The whole document, lines joined with `\n`.
    fn text(&self) -> String {
        (0..self.line_count())
            .map(|i| self.line(i))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A document held as lines, with a cursor and a view mode.
///
/// # Example
///
/// ```
/// use footquill::editor::buffer::{EditableView, TextBuffer};
///
/// let mut buffer = TextBuffer::from_text("one\ntwo");
/// buffer.append("\nthree");
/// assert_eq!(buffer.line_count(), 3);
/// assert_eq!(buffer.text(), "one\ntwo\nthree");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Position,
    mode: ViewMode,
}

impl TextBuffer {
    /// Splits `text` on `\n` into a buffer in source mode, cursor at the origin.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor: Position::default(),
            mode: ViewMode::Source,
        }
    }

    /// Builder-style cursor placement.
    pub fn with_cursor(mut self, pos: Position) -> Self {
        self.set_cursor(pos);
        self
    }

    /// Builder-style mode change.
    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    /// Changes the view mode.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// All lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl EditableView for TextBuffer {
    fn mode(&self) -> ViewMode {
        self.mode
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    /// Clamps the position into the document.
    fn set_cursor(&mut self, pos: Position) {
        let line = pos.line.min(self.lines.len() - 1);
        let ch = pos.ch.min(line_width(&self.lines[line]));
        self.cursor = Position::new(line, ch);
    }

    fn line(&self, index: usize) -> String {
        self.lines.get(index).cloned().unwrap_or_default()
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn replace_line(&mut self, index: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text.to_string();
        }
    }

    fn append(&mut self, text: &str) {
        let mut parts = text.split('\n');
        if let (Some(first), Some(last)) = (parts.next(), self.lines.last_mut()) {
            last.push_str(first);
        }
        self.lines.extend(parts.map(str::to_string));
    }

    fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_one_line() {
        let buffer = TextBuffer::default();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0), "");
    }

    #[test]
    fn test_trailing_newline_is_an_empty_last_line() {
        let mut buffer = TextBuffer::from_text("a\n");
        assert_eq!(buffer.lines(), &["a".to_string(), String::new()]);
        buffer.append("b");
        assert_eq!(buffer.text(), "a\nb");
    }

    #[test]
    fn test_cursor_is_clamped() {
        let buffer = TextBuffer::from_text("ab\ncd").with_cursor(Position::new(9, 9));
        assert_eq!(buffer.cursor(), Position::new(1, 2));
    }
}
