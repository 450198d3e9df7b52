//! Detection of the variable or dotted expression under the cursor

use regex::Regex;
use std::sync::OnceLock;

use crate::host::TextDocument;
use crate::position::{Position, byte_to_column};

/// Characters that end a word for the generic word-boundary fallback
const WORD_SEPARATORS: &str = "`~!@#$%^&*()-=+[{]}\\|;:'\",.<>/?";

fn expression_regex() -> &'static Regex {
    static EXPRESSION_REGEX: OnceLock<Regex> = OnceLock::new();
    EXPRESSION_REGEX.get_or_init(|| {
        Regex::new(r"[a-zA-Z_$][a-zA-Z0-9_$]*(\.[a-zA-Z_$][a-zA-Z0-9_$]*)*")
            .expect("Invalid expression regex")
    })
}

/// Find the dotted identifier whose span contains `column`
///
/// Matches are scanned left to right and the first one whose chars
/// `[start, last]` contain the column wins.
///
/// # Examples
/// ```
/// use debugtrace::expression_at;
/// assert_eq!(expression_at("foo.bar.baz", 4).as_deref(), Some("foo.bar.baz"));
/// assert_eq!(expression_at("x = 1", 2), None);
/// ```
pub fn expression_at(line: &str, column: usize) -> Option<String> {
    expression_regex()
        .find_iter(line)
        .find(|m| {
            let start = byte_to_column(line, m.start());
            let last = byte_to_column(line, m.end()) - 1;
            start <= column && column <= last
        })
        .map(|m| m.as_str().to_string())
}

/// Generic word-boundary detection, used when no dotted expression matches
///
/// A word is a run of chars that are neither whitespace nor separators.
/// A cursor sitting just after the last char of a word still selects it.
pub fn word_at(line: &str, column: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let is_word = |ch: char| !ch.is_whitespace() && !WORD_SEPARATORS.contains(ch);
    let column = column.min(chars.len());

    let mut start = column;
    while start > 0 && is_word(chars[start - 1]) {
        start -= 1;
    }
    let mut end = column;
    while end < chars.len() && is_word(chars[end]) {
        end += 1;
    }

    if start == end {
        None
    } else {
        Some(chars[start..end].iter().collect())
    }
}

/// Detect the expression to log at `position` in `document`
///
/// Falls back to the document's own word detection, and returns `None`
/// when neither finds anything.
pub fn detect_expression<D: TextDocument + ?Sized>(document: &D, position: Position) -> Option<String> {
    let line = document.line(position.line)?;
    expression_at(line, position.column).or_else(|| document.word_at(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_expression_every_column() {
        let line = "foo.bar.baz";
        for column in 0..=10 {
            assert_eq!(expression_at(line, column).as_deref(), Some("foo.bar.baz"), "column {}", column);
        }
    }

    #[test]
    fn test_past_end_misses_expression() {
        assert_eq!(expression_at("foo.bar.baz", 11), None);
        // The generic fallback still sees the word that ends there
        assert_eq!(word_at("foo.bar.baz", 11).as_deref(), Some("baz"));
    }

    #[test]
    fn test_picks_match_containing_column() {
        let line = "let total = order.items.length;";
        assert_eq!(expression_at(line, 0).as_deref(), Some("let"));
        assert_eq!(expression_at(line, 6).as_deref(), Some("total"));
        assert_eq!(expression_at(line, 20).as_deref(), Some("order.items.length"));
        assert_eq!(expression_at(line, 3), None);
    }

    #[test]
    fn test_dollar_and_underscore_identifiers() {
        assert_eq!(expression_at("$scope._value", 5).as_deref(), Some("$scope._value"));
    }

    #[test]
    fn test_call_is_not_part_of_expression() {
        assert_eq!(expression_at("a();", 0).as_deref(), Some("a"));
        assert_eq!(expression_at("a();", 1), None);
    }

    #[test]
    fn test_columns_counted_in_chars() {
        let line = "'🔎' + value";
        assert_eq!(expression_at(line, 6).as_deref(), Some("value"));
    }

    #[test]
    fn test_word_at_inside_and_outside() {
        assert_eq!(word_at("call(arg)", 6).as_deref(), Some("arg"));
        assert_eq!(word_at("a  b", 2), None);
        assert_eq!(word_at("", 0), None);
        assert_eq!(word_at("abc", 99).as_deref(), Some("abc"));
    }
}
