//! The five editor commands
//!
//! Each handler reads the active document once, computes its edits with the
//! pure helpers in this crate, and hands them to the host as one batch.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::LogConfig;
use crate::detect::detect_expression;
use crate::edit::{EditError, EditOp};
use crate::format::{display_file_name, format_log_statement, insertion_text};
use crate::host::{EditorHost, PromptRequest, TextDocument};
use crate::indent::indentation_of;
use crate::matcher::{comment_line, lines_to_delete, uncomment_line};
use crate::position::{Position, Range};
use crate::scanner::find_statement_end;

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// No active editor; nothing was done
    NoEditor,
    /// The user cancelled or gave an empty message
    Aborted,
    /// A log statement was inserted
    Inserted { at: Position, text: String },
    /// Existing log lines were deleted, commented or uncommented
    Changed { count: usize },
    /// There were no log lines to change
    NoneFound,
}

/// Host-invocable commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InsertLog,
    InsertLogWithMessage,
    DeleteAllLogs,
    CommentAllLogs,
    UncommentAllLogs,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::InsertLog,
        Command::InsertLogWithMessage,
        Command::DeleteAllLogs,
        Command::CommentAllLogs,
        Command::UncommentAllLogs,
    ];

    /// Identifier the host registers the command under
    pub fn id(&self) -> &'static str {
        match self {
            Command::InsertLog => "debugtrace.insertLog",
            Command::InsertLogWithMessage => "debugtrace.insertLogWithMessage",
            Command::DeleteAllLogs => "debugtrace.deleteAllLogs",
            Command::CommentAllLogs => "debugtrace.commentAllLogs",
            Command::UncommentAllLogs => "debugtrace.uncommentAllLogs",
        }
    }

    pub fn from_id(id: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|command| command.id() == id)
    }

    /// Run this command against `host` with a configuration snapshot
    pub fn run<H: EditorHost>(&self, host: &mut H, config: &LogConfig) -> Result<CommandOutcome, EditError> {
        debug!(command = self.id(), "running command");
        match self {
            Command::InsertLog => insert_log(host, config),
            Command::InsertLogWithMessage => insert_log_with_message(host, config),
            Command::DeleteAllLogs => delete_all_logs(host, config),
            Command::CommentAllLogs => comment_all_logs(host, config),
            Command::UncommentAllLogs => uncomment_all_logs(host, config),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

fn snapshot_lines<D: TextDocument + ?Sized>(document: &D) -> Vec<String> {
    (0..document.line_count())
        .filter_map(|index| document.line(index).map(str::to_string))
        .collect()
}

/// Where to insert the log statement for `active`, and the text to insert
fn plan_insertion<D: TextDocument + ?Sized>(
    document: &D,
    active: Position,
    config: &LogConfig,
    variable_or_message: Option<&str>,
    is_custom_message: bool,
) -> (Position, String) {
    let statement = format_log_statement(
        config,
        display_file_name(document.path()),
        active.line + 1,
        variable_or_message,
        is_custom_message,
    );

    let at = find_statement_end(document, active);
    // Indent like the last line of the statement
    let indentation = document.line(at.line - 1).map(indentation_of).unwrap_or("");

    (at, insertion_text(config, indentation, &statement))
}

fn insert<H: EditorHost>(host: &mut H, at: Position, text: String) -> Result<CommandOutcome, EditError> {
    host.apply_edits(vec![EditOp::Insert { at, text: text.clone() }])?;
    info!(line = at.line, "log statement inserted");
    Ok(CommandOutcome::Inserted { at, text })
}

/// Insert a log statement for the selection, or the expression at the cursor
pub fn insert_log<H: EditorHost>(host: &mut H, config: &LogConfig) -> Result<CommandOutcome, EditError> {
    let Some(document) = host.active_document() else {
        return Ok(CommandOutcome::NoEditor);
    };
    let selection = host.selection();

    let variable = if selection.is_empty() {
        detect_expression(document, selection.active)
    } else {
        Some(document.text_in(selection.range()))
    };
    debug!(?variable, "expression to log");

    let (at, text) = plan_insertion(document, selection.active, config, variable.as_deref(), false);
    insert(host, at, text)
}

/// Ask for a message and insert a log statement carrying it
pub fn insert_log_with_message<H: EditorHost>(
    host: &mut H,
    config: &LogConfig,
) -> Result<CommandOutcome, EditError> {
    if host.active_document().is_none() {
        return Ok(CommandOutcome::NoEditor);
    }

    let request = PromptRequest {
        prompt: "Enter custom log message".to_string(),
        placeholder: "Custom debug message".to_string(),
    };
    let Some(message) = host.prompt(&request).filter(|message| !message.is_empty()) else {
        debug!("log message prompt cancelled");
        return Ok(CommandOutcome::Aborted);
    };

    let Some(document) = host.active_document() else {
        return Ok(CommandOutcome::NoEditor);
    };
    let active = host.selection().active;

    let (at, text) = plan_insertion(document, active, config, Some(&message), true);
    insert(host, at, text)
}

/// Delete every log statement matching the configured signature, with its separator
pub fn delete_all_logs<H: EditorHost>(host: &mut H, config: &LogConfig) -> Result<CommandOutcome, EditError> {
    let Some(document) = host.active_document() else {
        return Ok(CommandOutcome::NoEditor);
    };
    let lines = snapshot_lines(document);

    let (count, indices) = lines_to_delete(&lines, &config.signature());
    if count == 0 {
        host.notify("No DebugTrace log statements found.");
        return Ok(CommandOutcome::NoneFound);
    }

    let edits = indices
        .into_iter()
        .map(|index| EditOp::Delete {
            range: Range::whole_line(index),
        })
        .collect();
    host.apply_edits(edits)?;

    info!(count, "log statements deleted");
    host.notify(&format!("Deleted {} DebugTrace log statement(s).", count));
    Ok(CommandOutcome::Changed { count })
}

/// Replace each line for which `transform` returns a new text
fn toggle_lines<H, F>(host: &mut H, transform: F) -> Result<Option<usize>, EditError>
where
    H: EditorHost,
    F: Fn(&str) -> Option<String>,
{
    let Some(document) = host.active_document() else {
        return Ok(None);
    };

    let edits: Vec<EditOp> = snapshot_lines(document)
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            transform(line).map(|text| EditOp::Replace {
                range: Range::new(Position::new(index, 0), Position::new(index, line.chars().count())),
                text,
            })
        })
        .collect();

    let count = edits.len();
    if count > 0 {
        host.apply_edits(edits)?;
    }
    Ok(Some(count))
}

/// Comment out every uncommented log statement
pub fn comment_all_logs<H: EditorHost>(host: &mut H, config: &LogConfig) -> Result<CommandOutcome, EditError> {
    let signature = config.signature();
    let Some(count) = toggle_lines(host, |line| comment_line(line, &signature))? else {
        return Ok(CommandOutcome::NoEditor);
    };

    if count == 0 {
        host.notify("No uncommented DebugTrace log statements found.");
        return Ok(CommandOutcome::NoneFound);
    }

    info!(count, "log statements commented");
    host.notify(&format!("Commented {} DebugTrace log statement(s).", count));
    Ok(CommandOutcome::Changed { count })
}

/// Uncomment every commented log statement
pub fn uncomment_all_logs<H: EditorHost>(host: &mut H, config: &LogConfig) -> Result<CommandOutcome, EditError> {
    let signature = config.signature();
    let Some(count) = toggle_lines(host, |line| uncomment_line(line, &signature))? else {
        return Ok(CommandOutcome::NoEditor);
    };

    if count == 0 {
        host.notify("No commented DebugTrace log statements found.");
        return Ok(CommandOutcome::NoneFound);
    }

    info!(count, "log statements uncommented");
    host.notify(&format!("Uncommented {} DebugTrace log statement(s).", count));
    Ok(CommandOutcome::Changed { count })
}

/// Where an inserted log statement would go for the current cursor
pub fn locate_statement_end<H: EditorHost>(host: &H) -> Option<Position> {
    let document = host.active_document()?;
    Some(find_statement_end(document, host.selection().active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LineDocument;
    use crate::host::MemoryHost;

    fn host(text: &str, cursor: Position) -> MemoryHost {
        MemoryHost::new(LineDocument::from_text("lib/main.dart", text)).with_cursor(cursor)
    }

    #[test]
    fn test_command_ids_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_id(command.id()), Some(command));
        }
        assert_eq!(Command::from_id("debugtrace.unknown"), None);
    }

    #[test]
    fn test_no_editor_is_silent() {
        let config = LogConfig::default();
        for command in Command::ALL {
            let mut h = MemoryHost::idle().with_prompt_answer("msg");
            assert_eq!(command.run(&mut h, &config), Ok(CommandOutcome::NoEditor));
            assert!(h.notifications().is_empty());
            assert!(h.batches().is_empty());
        }
    }

    #[test]
    fn test_plan_insertion_uses_statement_indentation() {
        let doc = LineDocument::from_text("a.dart", "  foo(\n    1,\n  );\nbar();");
        let (at, text) = plan_insertion(&doc, Position::new(0, 2), &LogConfig::default(), Some("foo"), false);

        assert_eq!(at, Position::new(3, 0));
        assert_eq!(text, "  print('DebugTrace🔎: [a.dart:1] foo: ${foo}');\n");
    }

    #[test]
    fn test_locate_statement_end() {
        let h = host("call(\n  x,\n);\nnext();", Position::new(0, 2));
        assert_eq!(locate_statement_end(&h), Some(Position::new(3, 0)));

        // Scanning from inside the call sees the ')' first and never balances
        let h = host("call(\n  x,\n);\nnext();", Position::new(1, 2));
        assert_eq!(locate_statement_end(&h), Some(Position::new(2, 0)));
        assert_eq!(locate_statement_end(&MemoryHost::idle()), None);
    }

    #[test]
    fn test_comment_skips_edit_when_nothing_matches() {
        let mut h = host("a();\nb();", Position::default());
        let outcome = comment_all_logs(&mut h, &LogConfig::default()).unwrap();

        assert_eq!(outcome, CommandOutcome::NoneFound);
        assert!(h.batches().is_empty());
        assert_eq!(h.notifications(), &["No uncommented DebugTrace log statements found.".to_string()]);
    }
}
