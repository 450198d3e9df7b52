//! Statement-boundary scanner
//!
//! Finds where the statement under the cursor ends so a log line can be
//! inserted after it instead of in the middle of an open call or literal.
//! This is a single forward pass that only understands quotes and
//! bracket depth; it is not a parser.

use tracing::debug;

use crate::host::TextDocument;
use crate::position::Position;

/// Scanner state carried across line boundaries within one scan
///
/// Depth counters are never clamped, so unbalanced closers can drive
/// them negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    pub open_braces: i32,
    pub open_parens: i32,
    pub open_brackets: i32,
    /// Quote char of the string literal currently open
    pub string_delimiter: Option<char>,
}

impl ScanState {
    pub fn in_string(&self) -> bool {
        self.string_delimiter.is_some()
    }

    pub fn at_depth_zero(&self) -> bool {
        self.open_braces == 0 && self.open_parens == 0 && self.open_brackets == 0
    }

    /// Feed one char, given the number of backslashes directly before it
    ///
    /// # Returns
    /// * `true` if the char is a statement terminator at depth zero
    pub fn feed(&mut self, ch: char, preceding_backslashes: usize) -> bool {
        if (ch == '"' || ch == '\'') && preceding_backslashes % 2 == 0 {
            match self.string_delimiter {
                None => self.string_delimiter = Some(ch),
                Some(open) if open == ch => self.string_delimiter = None,
                Some(_) => {}
            }
            return false;
        }

        if self.in_string() {
            return false;
        }

        match ch {
            '{' => self.open_braces += 1,
            '}' => self.open_braces -= 1,
            '(' => self.open_parens += 1,
            ')' => self.open_parens -= 1,
            '[' => self.open_brackets += 1,
            ']' => self.open_brackets -= 1,
            ';' => return self.at_depth_zero(),
            _ => {}
        }
        false
    }
}

/// A line that ends in `;` and opens nothing needs no scanning
fn is_simple_statement(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.ends_with(';') && !trimmed.contains(['{', '(', '['])
}

/// Find the position just after the statement that starts at or encloses `start`
///
/// Scanning begins at column 0 of `start.line` and runs to the end of the
/// document. The result is always column 0 of a line: the line after the
/// one holding the depth-zero `;`, or the line after `start.line` when no
/// terminator is found.
pub fn find_statement_end<D: TextDocument + ?Sized>(document: &D, start: Position) -> Position {
    let fallback = start.next_line_start();

    let Some(first_line) = document.line(start.line) else {
        return fallback;
    };

    if is_simple_statement(first_line) {
        debug!(line = start.line, "simple statement, no scan needed");
        return fallback;
    }

    let mut state = ScanState::default();
    for line_index in start.line..document.line_count() {
        let Some(text) = document.line(line_index) else {
            break;
        };

        let mut backslashes = 0;
        for ch in text.chars() {
            if state.feed(ch, backslashes) {
                debug!(line = line_index, "statement terminator found");
                return Position::new(line_index + 1, 0);
            }
            backslashes = if ch == '\\' { backslashes + 1 } else { 0 };
        }
    }

    debug!(line = start.line, ?state, "no terminator found, using next line");
    fallback
}
