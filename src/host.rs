//! The editor capabilities the commands depend on
//!
//! Commands never talk to a real editor directly. They read a document
//! snapshot through [`TextDocument`], and send edits, prompts and
//! notifications through [`EditorHost`]. [`MemoryHost`] is the in-memory
//! adapter used by the command-line tool and the tests.

use tracing::{info, warn};

use crate::detect;
use crate::document::LineDocument;
use crate::edit::{EditError, EditOp};
use crate::position::{Position, Range, column_to_byte};

/// Read-only access to the lines of a document
pub trait TextDocument {
    /// Number of lines (always at least one)
    fn line_count(&self) -> usize;

    /// Text of a line without its line break
    fn line(&self, index: usize) -> Option<&str>;

    /// Path or name the document was opened from
    fn path(&self) -> &str;

    /// Generic word under `position`, used when no dotted expression matches
    fn word_at(&self, position: Position) -> Option<String> {
        self.line(position.line)
            .and_then(|line| detect::word_at(line, position.column))
    }

    /// Text covered by `range`, lines joined with `\n`
    fn text_in(&self, range: Range) -> String {
        let mut parts = Vec::new();
        for index in range.start.line..=range.end.line {
            let Some(line) = self.line(index) else {
                break;
            };
            let from = if index == range.start.line {
                column_to_byte(line, range.start.column)
            } else {
                0
            };
            let to = if index == range.end.line {
                column_to_byte(line, range.end.column)
            } else {
                line.len()
            };
            parts.push(line.get(from..to.max(from)).unwrap_or(""));
        }
        parts.join("\n")
    }
}

/// Cursor or selection in the active editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Where the selection started
    pub anchor: Position,
    /// Where the cursor is
    pub active: Position,
}

impl Selection {
    pub fn cursor(position: Position) -> Self {
        Self {
            anchor: position,
            active: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Selected range, ordered start to end
    pub fn range(&self) -> Range {
        if self.anchor <= self.active {
            Range::new(self.anchor, self.active)
        } else {
            Range::new(self.active, self.anchor)
        }
    }
}

/// Free-text question shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub prompt: String,
    pub placeholder: String,
}

/// The editor a command runs against
pub trait EditorHost {
    type Document: TextDocument;

    /// The document in the active editor, if any
    fn active_document(&self) -> Option<&Self::Document>;

    /// Selection in the active editor
    fn selection(&self) -> Selection;

    /// Apply a batch of edits; either all of them land or none do
    fn apply_edits(&mut self, edits: Vec<EditOp>) -> Result<(), EditError>;

    /// Ask the user for text; `None` means cancelled
    fn prompt(&mut self, request: &PromptRequest) -> Option<String>;

    /// Show an informational message
    fn notify(&mut self, message: &str);
}

/// In-memory editor host over a [`LineDocument`]
///
/// Records every applied batch and every notification.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    document: Option<LineDocument>,
    selection: Selection,
    prompt_answer: Option<String>,
    prompts: Vec<PromptRequest>,
    notifications: Vec<String>,
    batches: Vec<Vec<EditOp>>,
}

impl MemoryHost {
    pub fn new(document: LineDocument) -> Self {
        Self {
            document: Some(document),
            ..Self::default()
        }
    }

    /// A host with no open editor
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_cursor(mut self, position: Position) -> Self {
        self.selection = Selection::cursor(position);
        self
    }

    pub fn with_selection(mut self, anchor: Position, active: Position) -> Self {
        self.selection = Selection { anchor, active };
        self
    }

    /// Answer the next prompts with `answer`
    pub fn with_prompt_answer(mut self, answer: impl Into<String>) -> Self {
        self.prompt_answer = Some(answer.into());
        self
    }

    pub fn document(&self) -> Option<&LineDocument> {
        self.document.as_ref()
    }

    pub fn into_document(self) -> Option<LineDocument> {
        self.document
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn prompts(&self) -> &[PromptRequest] {
        &self.prompts
    }

    pub fn batches(&self) -> &[Vec<EditOp>] {
        &self.batches
    }
}

impl EditorHost for MemoryHost {
    type Document = LineDocument;

    fn active_document(&self) -> Option<&LineDocument> {
        self.document.as_ref()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn apply_edits(&mut self, edits: Vec<EditOp>) -> Result<(), EditError> {
        let Some(document) = self.document.as_mut() else {
            return Ok(());
        };

        match document.apply_edits(&edits) {
            Ok(result) => {
                info!(
                    applied = result.applied_count,
                    line_shift = result.line_shift,
                    "edit batch applied"
                );
                self.batches.push(edits);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "edit batch rejected");
                Err(e)
            }
        }
    }

    fn prompt(&mut self, request: &PromptRequest) -> Option<String> {
        self.prompts.push(request.clone());
        self.prompt_answer.clone()
    }

    fn notify(&mut self, message: &str) {
        info!(text = message, "notification");
        self.notifications.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(text: &str) -> MemoryHost {
        MemoryHost::new(LineDocument::from_text("src/app.dart", text))
    }

    #[test]
    fn test_text_in_single_line() {
        let h = host("final total = order.total;");
        let doc = h.active_document().unwrap();
        let range = Range::new(Position::new(0, 14), Position::new(0, 25));

        assert_eq!(doc.text_in(range), "order.total");
    }

    #[test]
    fn test_text_in_multi_line() {
        let h = host("abc\ndef\nghi");
        let doc = h.active_document().unwrap();
        let range = Range::new(Position::new(0, 1), Position::new(2, 2));

        assert_eq!(doc.text_in(range), "bc\ndef\ngh");
    }

    #[test]
    fn test_selection_range_is_ordered() {
        let selection = Selection {
            anchor: Position::new(2, 4),
            active: Position::new(1, 0),
        };

        assert!(!selection.is_empty());
        assert_eq!(selection.range(), Range::new(Position::new(1, 0), Position::new(2, 4)));
        assert!(Selection::cursor(Position::new(3, 3)).is_empty());
    }

    #[test]
    fn test_records_batches_and_notifications() {
        let mut h = host("a();");
        h.apply_edits(vec![EditOp::Insert {
            at: Position::new(1, 0),
            text: "b();\n".to_string(),
        }])
        .unwrap();
        h.notify("done");

        assert_eq!(h.batches().len(), 1);
        assert_eq!(h.notifications(), &["done".to_string()]);
        assert_eq!(h.document().unwrap().text(), "a();\nb();\n");
    }

    #[test]
    fn test_rejected_batch_not_recorded() {
        let mut h = host("a();");
        let result = h.apply_edits(vec![EditOp::Delete {
            range: Range::whole_line(7),
        }]);

        assert!(result.is_err());
        assert!(h.batches().is_empty());
    }

    #[test]
    fn test_prompt_answer_and_idle_host() {
        let mut h = MemoryHost::idle().with_prompt_answer("hello");
        let request = PromptRequest {
            prompt: "Enter".to_string(),
            placeholder: String::new(),
        };

        assert!(h.active_document().is_none());
        assert_eq!(h.prompt(&request).as_deref(), Some("hello"));
        assert_eq!(h.prompts().len(), 1);
    }
}
