use crate::edit::{BatchResult, EditError, EditOp, apply_edits};
use crate::host::TextDocument;

/// Line break style of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect the line ending used by `text` (LF unless any CRLF is present)
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// In-memory document held as a sequence of lines
///
/// Lines are stored without their line breaks. A document always has at
/// least one line, and text ending in a newline has an empty last line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDocument {
    path: String,
    lines: Vec<String>,
    line_ending: LineEnding,
}

impl LineDocument {
    /// Split `text` into lines, remembering its line ending
    pub fn from_text(path: impl Into<String>, text: &str) -> Self {
        let line_ending = LineEnding::detect(text);
        let lines = text
            .split('\n')
            .map(|line| match line_ending {
                LineEnding::CrLf => line.strip_suffix('\r').unwrap_or(line).to_string(),
                LineEnding::Lf => line.to_string(),
            })
            .collect();

        Self {
            path: path.into(),
            lines,
            line_ending,
        }
    }

    pub fn from_lines(path: impl Into<String>, lines: Vec<String>) -> Self {
        let lines = if lines.is_empty() { vec![String::new()] } else { lines };
        Self {
            path: path.into(),
            lines,
            line_ending: LineEnding::Lf,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Full text, joined with the document's line ending
    pub fn text(&self) -> String {
        self.lines.join(self.line_ending.as_str())
    }

    /// BLAKE3 hash of the full text (hex-encoded)
    pub fn checksum(&self) -> String {
        blake3::hash(self.text().as_bytes()).to_hex().to_string()
    }

    /// Apply an edit batch; on error the document is left unchanged
    pub fn apply_edits(&mut self, edits: &[EditOp]) -> Result<BatchResult, EditError> {
        let (lines, result) = apply_edits(&self.lines, edits)?;
        self.lines = lines;
        Ok(result)
    }
}

impl TextDocument for LineDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Position, Range};

    #[test]
    fn test_from_text_trailing_newline() {
        let doc = LineDocument::from_text("a.dart", "a();\nb();\n");

        assert_eq!(doc.lines(), &["a();", "b();", ""]);
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.text(), "a();\nb();\n");
    }

    #[test]
    fn test_crlf_round_trip() {
        let doc = LineDocument::from_text("a.dart", "a();\r\nb();\r\n");

        assert_eq!(doc.line_ending(), LineEnding::CrLf);
        assert_eq!(doc.line(1), Some("b();"));
        assert_eq!(doc.text(), "a();\r\nb();\r\n");
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let doc = LineDocument::from_text("empty.dart", "");
        assert_eq!(doc.line_count(), 1);

        let doc = LineDocument::from_lines("empty.dart", Vec::new());
        assert_eq!(doc.line_count(), 1);
    }

    #[test]
    fn test_checksum_changes_with_edit() {
        let mut doc = LineDocument::from_text("a.dart", "a();\n");
        let before = doc.checksum();

        assert_eq!(before, blake3::hash(b"a();\n").to_hex().to_string());

        doc.apply_edits(&[EditOp::Insert {
            at: Position::new(0, 0),
            text: "x".to_string(),
        }])
        .unwrap();

        assert_ne!(doc.checksum(), before);
        assert_eq!(doc.text(), "xa();\n");
    }

    #[test]
    fn test_rejected_batch_leaves_document_untouched() {
        let mut doc = LineDocument::from_text("a.dart", "a();\nb();");
        let edits = vec![
            EditOp::Delete { range: Range::whole_line(0) },
            EditOp::Insert {
                at: Position::new(9, 0),
                text: "x".to_string(),
            },
        ];

        assert!(doc.apply_edits(&edits).is_err());
        assert_eq!(doc.text(), "a();\nb();");
    }
}
