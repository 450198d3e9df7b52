//! Recognising previously inserted log statements
//!
//! Deletion uses the strict [`LogSignature::matches`] test. Commenting and
//! uncommenting use the looser [`LogSignature::is_toggle_candidate`], which
//! also accepts the built-in print calls and any `[...]:` location tag.

use std::collections::BTreeSet;

use tracing::debug;

use crate::format::SEPARATOR_LINE;
use crate::indent::indentation_of;

/// Line comment marker written and recognised by the toggles
pub const COMMENT_MARKER: &str = "//";

/// Calls recognised by the toggles whatever the configured log function is
const BUILTIN_LOG_CALLS: [&str; 2] = ["print(", "debugPrint("];

/// Log function and prefix that identify an inserted statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSignature {
    call_token: String,
    prefix: String,
}

impl LogSignature {
    pub fn new(log_function: &str, prefix: &str) -> Self {
        Self {
            call_token: format!("{}(", log_function),
            prefix: prefix.to_string(),
        }
    }

    /// The log function name followed by `(`
    pub fn call_token(&self) -> &str {
        &self.call_token
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Strict test: the line calls the log function and carries the prefix
    pub fn matches(&self, line: &str) -> bool {
        line.contains(&self.call_token) && line.contains(&self.prefix)
    }

    /// Loose test used by comment and uncomment
    pub fn is_toggle_candidate(&self, content: &str) -> bool {
        let has_call = content.contains(&self.call_token)
            || BUILTIN_LOG_CALLS.iter().any(|call| content.contains(call));
        let has_tag = content.contains(&self.prefix) || (content.contains('[') && content.contains("]:"));
        has_call && has_tag
    }
}

/// Whether the first non-blank text of `line` is a line comment
pub fn is_commented(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_MARKER)
}

/// Indices of uncommented lines matching `signature`
pub fn find_log_lines<S: AsRef<str>>(lines: &[S], signature: &LogSignature) -> BTreeSet<usize> {
    let found: BTreeSet<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.as_ref();
            signature.matches(line) && !is_commented(line)
        })
        .map(|(index, _)| index)
        .collect();

    debug!(count = found.len(), "log lines found");
    found
}

/// Indices of separator lines directly following a matched line
pub fn find_separator_lines<S: AsRef<str>>(matched: &BTreeSet<usize>, lines: &[S]) -> BTreeSet<usize> {
    matched
        .iter()
        .map(|index| index + 1)
        .filter(|next| {
            lines
                .get(*next)
                .is_some_and(|line| line.as_ref().trim() == SEPARATOR_LINE)
        })
        .collect()
}

/// Matched log lines and their separators, highest index first
pub fn lines_to_delete<S: AsRef<str>>(lines: &[S], signature: &LogSignature) -> (usize, Vec<usize>) {
    let matched = find_log_lines(lines, signature);
    let separators = find_separator_lines(&matched, lines);
    let log_count = matched.len();

    let mut all: Vec<usize> = matched.union(&separators).copied().collect();
    all.reverse();
    (log_count, all)
}

/// Commented form of `line`, if it is an uncommented log statement
///
/// The marker and one space go between the indentation and the code.
pub fn comment_line(line: &str, signature: &LogSignature) -> Option<String> {
    if is_commented(line) || !signature.is_toggle_candidate(line.trim()) {
        return None;
    }

    let indentation = indentation_of(line);
    let code = &line[indentation.len()..];
    Some(format!("{}{} {}", indentation, COMMENT_MARKER, code))
}

/// Uncommented form of `line`, if it is a commented log statement
///
/// Removes the marker and at most one following space.
pub fn uncomment_line(line: &str, signature: &LogSignature) -> Option<String> {
    let indentation = indentation_of(line);
    let after_marker = line[indentation.len()..].strip_prefix(COMMENT_MARKER)?;
    let code = after_marker.strip_prefix(' ').unwrap_or(after_marker);

    if !signature.is_toggle_candidate(code.trim()) {
        return None;
    }

    Some(format!("{}{}", indentation, code))
}
