use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::position::{Position, Range, column_to_byte};

/// A single change in an edit batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditOp {
    /// Insert text at a position
    Insert { at: Position, text: String },
    /// Replace a range with text
    Replace { range: Range, text: String },
    /// Delete a range
    Delete { range: Range },
}

impl EditOp {
    /// The range this edit overwrites (empty for inserts)
    pub fn range(&self) -> Range {
        match self {
            EditOp::Insert { at, .. } => Range::new(*at, *at),
            EditOp::Replace { range, .. } | EditOp::Delete { range } => *range,
        }
    }

    /// The text this edit writes
    pub fn text(&self) -> &str {
        match self {
            EditOp::Insert { text, .. } | EditOp::Replace { text, .. } => text,
            EditOp::Delete { .. } => "",
        }
    }
}

/// Result of applying an edit batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    /// Number of edits applied
    pub applied_count: usize,
    /// Line count shift (positive = document grew, negative = shrank)
    pub line_shift: i64,
}

/// Error types for edit operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// Position outside the document
    #[error("Position {position} out of bounds (line count: {line_count})")]
    OutOfBounds { position: Position, line_count: usize },
    /// Range whose end comes before its start
    #[error("Invalid range: end ({end}) before start ({start})")]
    InvalidRange { start: Position, end: Position },
    /// Two edits in one batch touch the same text
    #[error("Edits overlap at {start}")]
    Overlapping { start: Position },
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Check that `position` addresses a char boundary in `lines`
///
/// `(line_count, 0)` is accepted and means "after the last line".
fn validate_position(lines: &[String], position: Position) -> Result<(), EditError> {
    let in_bounds = match lines.get(position.line) {
        Some(line) => position.column <= char_len(line),
        None => position.line == lines.len() && position.column == 0,
    };

    if in_bounds {
        Ok(())
    } else {
        Err(EditError::OutOfBounds {
            position,
            line_count: lines.len(),
        })
    }
}

/// Validate an edit against document lines
///
/// # Returns
/// * `Ok(())` if the edit is valid
/// * `Err(EditError)` if the edit is invalid
pub fn validate_edit(edit: &EditOp, lines: &[String]) -> Result<(), EditError> {
    let range = edit.range();

    if range.end < range.start {
        return Err(EditError::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }

    validate_position(lines, range.start)?;
    validate_position(lines, range.end)
}

/// Sort edits by start position in descending order for sequential application
///
/// Applying from the end of the document backwards keeps the positions of
/// edits that are still pending valid. Edits sharing a start position are
/// reversed as well, so that inserts at one spot end up in batch order.
pub fn sort_edits_descending(edits: &[EditOp]) -> Vec<EditOp> {
    let mut indexed: Vec<(usize, &EditOp)> = edits.iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        b.range().start.cmp(&a.range().start).then(ib.cmp(ia))
    });
    indexed.into_iter().map(|(_, edit)| edit.clone()).collect()
}

/// Replace `range` in `lines` with `text`, splitting on `\n`
fn splice(lines: &mut Vec<String>, range: Range, text: &str) {
    let mut range = range;

    // Writing after the last line starts a fresh one
    if range.start.line == lines.len() {
        lines.push(String::new());
    }

    let last = lines.len() - 1;
    if range.end.line > last {
        range.end = Position::new(last, char_len(&lines[last]));
    }

    let start_line = &lines[range.start.line];
    let end_line = &lines[range.end.line];
    let prefix = &start_line[..column_to_byte(start_line, range.start.column)];
    let suffix = &end_line[column_to_byte(end_line, range.end.column)..];

    let joined = format!("{}{}{}", prefix, text, suffix);
    let replacement: Vec<String> = joined.split('\n').map(str::to_string).collect();
    lines.splice(range.start.line..=range.end.line, replacement);
}

/// Apply an edit batch to document lines
///
/// This function:
/// 1. Validates every edit against the original lines
/// 2. Sorts edits descending and rejects overlapping ranges
/// 3. Applies each edit to a copy of the lines
///
/// Nothing is applied unless the whole batch is valid.
///
/// # Returns
/// * `Ok((Vec<String>, BatchResult))` - New lines and batch summary
/// * `Err(EditError)` - The batch was rejected
pub fn apply_edits(lines: &[String], edits: &[EditOp]) -> Result<(Vec<String>, BatchResult), EditError> {
    for edit in edits {
        validate_edit(edit, lines)?;
    }

    let sorted = sort_edits_descending(edits);
    for pair in sorted.windows(2) {
        let (higher, lower) = (pair[0].range(), pair[1].range());
        if lower.end > higher.start {
            return Err(EditError::Overlapping { start: higher.start });
        }
    }

    let mut current = lines.to_vec();
    for edit in &sorted {
        splice(&mut current, edit.range(), edit.text());
    }

    let result = BatchResult {
        applied_count: sorted.len(),
        line_shift: current.len() as i64 - lines.len() as i64,
    };
    Ok((current, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn insert(line: usize, column: usize, text: &str) -> EditOp {
        EditOp::Insert {
            at: Position::new(line, column),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_insert_line_between() {
        let original = lines(&["a();", "b();"]);
        let (new_lines, result) = apply_edits(&original, &[insert(1, 0, "log();\n")]).unwrap();

        assert_eq!(new_lines, lines(&["a();", "log();", "b();"]));
        assert_eq!(result.applied_count, 1);
        assert_eq!(result.line_shift, 1);
    }

    #[test]
    fn test_insert_after_last_line() {
        let original = lines(&["a();"]);
        let (new_lines, _) = apply_edits(&original, &[insert(1, 0, "log();\n")]).unwrap();

        assert_eq!(new_lines, lines(&["a();", "log();", ""]));
    }

    #[test]
    fn test_insert_mid_line() {
        let original = lines(&["ab🔎cd"]);
        let (new_lines, _) = apply_edits(&original, &[insert(0, 3, "X")]).unwrap();

        assert_eq!(new_lines, lines(&["ab🔎Xcd"]));
    }

    #[test]
    fn test_delete_whole_lines_descending() {
        let original = lines(&["keep", "drop1", "keep2", "drop2", "tail"]);
        let edits = vec![
            EditOp::Delete { range: Range::whole_line(1) },
            EditOp::Delete { range: Range::whole_line(3) },
        ];
        let (new_lines, result) = apply_edits(&original, &edits).unwrap();

        assert_eq!(new_lines, lines(&["keep", "keep2", "tail"]));
        assert_eq!(result.line_shift, -2);
    }

    #[test]
    fn test_delete_last_line_clears_it() {
        let original = lines(&["keep", "drop"]);
        let (new_lines, _) = apply_edits(&original, &[EditOp::Delete { range: Range::whole_line(1) }]).unwrap();

        assert_eq!(new_lines, lines(&["keep", ""]));
    }

    #[test]
    fn test_replace_line_content() {
        let original = lines(&["  x();", "y();"]);
        let edit = EditOp::Replace {
            range: Range::new(Position::new(0, 0), Position::new(0, 6)),
            text: "  // x();".to_string(),
        };
        let (new_lines, _) = apply_edits(&original, &[edit]).unwrap();

        assert_eq!(new_lines, lines(&["  // x();", "y();"]));
    }

    #[test]
    fn test_same_position_inserts_keep_batch_order() {
        let original = lines(&["a", "b"]);
        let edits = vec![insert(1, 0, "first\n"), insert(1, 0, "second\n")];
        let (new_lines, _) = apply_edits(&original, &edits).unwrap();

        assert_eq!(new_lines, lines(&["a", "first", "second", "b"]));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let original = lines(&["abc"]);

        let result = apply_edits(&original, &[insert(0, 4, "x")]);
        assert_eq!(
            result,
            Err(EditError::OutOfBounds {
                position: Position::new(0, 4),
                line_count: 1,
            })
        );

        let result = apply_edits(&original, &[insert(2, 0, "x")]);
        assert!(matches!(result, Err(EditError::OutOfBounds { .. })));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let original = lines(&["abc", "def"]);
        let edit = EditOp::Delete {
            range: Range::new(Position::new(1, 0), Position::new(0, 1)),
        };

        assert!(matches!(apply_edits(&original, &[edit]), Err(EditError::InvalidRange { .. })));
    }

    #[test]
    fn test_overlapping_batch_rejected() {
        let original = lines(&["a", "b", "c"]);
        let edits = vec![
            EditOp::Delete {
                range: Range::new(Position::new(0, 0), Position::new(2, 0)),
            },
            EditOp::Delete { range: Range::whole_line(1) },
        ];

        assert_eq!(
            apply_edits(&original, &edits),
            Err(EditError::Overlapping {
                start: Position::new(1, 0)
            })
        );
    }

    #[test]
    fn test_sort_edits_descending() {
        let edits = vec![insert(1, 0, "a"), insert(5, 0, "b"), insert(3, 2, "c")];
        let sorted = sort_edits_descending(&edits);

        assert_eq!(sorted[0].range().start, Position::new(5, 0));
        assert_eq!(sorted[1].range().start, Position::new(3, 2));
        assert_eq!(sorted[2].range().start, Position::new(1, 0));
    }
}
