use serde::{Deserialize, Serialize};

/// Position in a document (line and column numbers)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in chars)
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Column 0 of the line after this one
    pub fn next_line_start(&self) -> Position {
        Position { line: self.line + 1, column: 0 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Range between two positions in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Starting position (inclusive)
    pub start: Position,
    /// Ending position (exclusive)
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering a whole line including its line break
    pub fn whole_line(line: usize) -> Self {
        Self {
            start: Position::new(line, 0),
            end: Position::new(line + 1, 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Convert a char column to a byte offset within `line`
///
/// # Returns
/// * The byte offset of the char at `column`
/// * `line.len()` if the column is at or past the end of the line
pub fn column_to_byte(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

/// Convert a byte offset within `line` to a char column
pub fn byte_to_column(line: &str, byte_offset: usize) -> usize {
    let clamped = byte_offset.min(line.len());
    line.char_indices().take_while(|(offset, _)| *offset < clamped).count()
}
