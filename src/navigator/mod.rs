//! Marker ↔ definition navigation and footnote insertion.
//!
//! [`navigate`] is a single-shot decision on the cursor line. The first
//! branch that applies wins:
//!
//! 1. On a definition line (`[^label]:`), jump to just after the first
//!    reference to that label anywhere in the document.
//! 2. With the cursor on or touching a marker, take the first digit run of
//!    the marker and jump to the end of the first definition whose label is
//!    that integer.
//! 3. Otherwise insert `[^N]` at the cursor, where `N` is one more than the
//!    largest integer label in the document, append a `[^N]: ` stub as the
//!    last line and put the cursor at its end.
//!
//! No state survives between calls: the same text and cursor always take the
//! same branch and end at the same position.
//!
//! # Example
//!
//! ```
//! use footquill::editor::buffer::{EditableView, TextBuffer};
//! use footquill::editor::cursor::Position;
//! use footquill::navigator::{navigate, NavigationOutcome};
//!
//! let mut buffer = TextBuffer::from_text("Text[^1] here\n\n[^1]: note").with_cursor(Position::new(0, 6));
//! let outcome = navigate(&mut buffer);
//! assert!(matches!(outcome, NavigationOutcome::JumpedToDefinition { .. }));
//! assert_eq!(buffer.cursor(), Position::new(2, 5));
//! ```

use crate::editor::buffer::EditableView;
use crate::editor::cursor::{byte_to_col, col_to_byte, line_width, Position};
use crate::footnote::patterns::{find_definition, markers, numeric_token, parse_numeric_label};

/// Which branch ran, and where the cursor ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// No focused view, the view is not in source mode, or no footnote
    /// number is left to insert. Nothing changed.
    Unavailable,
    /// Moved from a definition line to the first reference.
    JumpedToReference { label: String, position: Position },
    /// Moved from a reference to its definition.
    JumpedToDefinition { label: String, position: Position },
    /// Inserted a new marker and definition stub.
    Created { label: String, position: Position },
}

impl NavigationOutcome {
    /// Returns true if a jump or an insert happened.
    pub fn performed(&self) -> bool {
        !matches!(self, NavigationOutcome::Unavailable)
    }

    /// The final cursor position, if anything happened.
    pub fn position(&self) -> Option<Position> {
        match self {
            NavigationOutcome::Unavailable => None,
            NavigationOutcome::JumpedToReference { position, .. }
            | NavigationOutcome::JumpedToDefinition { position, .. }
            | NavigationOutcome::Created { position, .. } => Some(*position),
        }
    }
}

/// Runs the navigation decision on the view's cursor line.
pub fn navigate<V: EditableView + ?Sized>(view: &mut V) -> NavigationOutcome {
    if !view.mode().is_source() {
        tracing::debug!(mode = %view.mode(), "footnote navigation needs source mode");
        return NavigationOutcome::Unavailable;
    }

    let cursor = view.cursor();
    let line = view.line(cursor.line);

    if let Some(outcome) = jump_to_reference(view, &line) {
        return outcome;
    }
    if let Some(outcome) = jump_to_definition(view, &line, cursor) {
        return outcome;
    }
    create_footnote(view, &line, cursor)
}

/// Finds the first `[^label]` in `line` that is not followed by `:`.
fn find_reference(line: &str, marker: &str) -> Option<usize> {
    line.match_indices(marker)
        .map(|(start, _)| start + marker.len())
        .find(|&end| !line[end..].starts_with(':'))
}

fn jump_to_reference<V: EditableView + ?Sized>(
    view: &mut V,
    line: &str,
) -> Option<NavigationOutcome> {
    let definition = find_definition(line)?;
    let marker = definition.marker_text();

    for i in 0..view.line_count() {
        let scan = view.line(i);
        if let Some(end) = find_reference(&scan, &marker) {
            let position = Position::new(i, byte_to_col(&scan, end));
            view.set_cursor(position);
            return Some(NavigationOutcome::JumpedToReference {
                label: definition.label.to_string(),
                position,
            });
        }
    }
    None
}

fn jump_to_definition<V: EditableView + ?Sized>(
    view: &mut V,
    line: &str,
    cursor: Position,
) -> Option<NavigationOutcome> {
    let target = markers(line).find(|m| {
        let start = byte_to_col(line, m.start);
        let end = byte_to_col(line, m.marker_end());
        (start..=end).contains(&cursor.ch)
    })?;
    let number = numeric_token(target.label)?;

    for i in 0..view.line_count() {
        let scan = view.line(i);
        let Some(definition) = find_definition(&scan) else {
            continue;
        };
        if parse_numeric_label(definition.label) == Some(number) {
            let position = Position::new(i, byte_to_col(&scan, definition.end));
            view.set_cursor(position);
            return Some(NavigationOutcome::JumpedToDefinition {
                label: definition.label.to_string(),
                position,
            });
        }
    }
    None
}

/// One more than the largest integer label in `text`; labels that are not
/// integers are ignored. `None` when the largest label is `u64::MAX`.
pub fn next_footnote_id(text: &str) -> Option<u64> {
    markers(text)
        .filter_map(|m| parse_numeric_label(m.label))
        .max()
        .unwrap_or(0)
        .checked_add(1)
}

fn create_footnote<V: EditableView + ?Sized>(
    view: &mut V,
    line: &str,
    cursor: Position,
) -> NavigationOutcome {
    let Some(id) = next_footnote_id(&view.text()) else {
        tracing::warn!("no free footnote number left, not inserting");
        return NavigationOutcome::Unavailable;
    };
    let label = id.to_string();

    let split = col_to_byte(line, cursor.ch);
    let new_line = format!("{}[^{}]{}", &line[..split], label, &line[split..]);
    view.replace_line(cursor.line, &new_line);

    let stub = format!("[^{}]: ", label);
    let last = view.line(view.line_count().saturating_sub(1));
    if last.is_empty() {
        view.append(&stub);
    } else {
        view.append(&format!("\n{}", stub));
    }

    let position = Position::new(view.line_count().saturating_sub(1), line_width(&stub));
    view.set_cursor(position);
    tracing::debug!(label = %label, line = cursor.line, "inserted footnote");
    NavigationOutcome::Created { label, position }
}
