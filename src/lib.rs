// Position and range types
pub mod position;

// Indentation extraction
pub mod indent;

// Expression detection under the cursor
pub mod detect;

// Statement-boundary scanner
pub mod scanner;

// Log statement formatting
pub mod format;

// Log line recognition and comment toggling
pub mod matcher;

// Configuration
pub mod config;

// In-memory line document
pub mod document;

// Edit batches
pub mod edit;

// Editor host capabilities
pub mod host;

// Command handlers
pub mod commands;

// File operations module
pub mod file;

// JSON output module
pub mod json;

// Re-exports
pub use position::{Position, Range};
pub use indent::indentation_of;
pub use detect::{detect_expression, expression_at, word_at};
pub use scanner::{ScanState, find_statement_end};
pub use format::{display_file_name, format_log_statement, format_message, insertion_text, SEPARATOR_LINE};
pub use matcher::{
    LogSignature, COMMENT_MARKER, is_commented,
    find_log_lines, find_separator_lines, lines_to_delete, comment_line, uncomment_line,
};
pub use config::{ConfigError, ConfigProvider, JsonSettings, LayeredConfig, LogConfig};
pub use document::{LineDocument, LineEnding};
pub use edit::{EditOp, EditError, BatchResult, apply_edits, sort_edits_descending, validate_edit};
pub use host::{EditorHost, MemoryHost, PromptRequest, Selection, TextDocument};
pub use commands::{
    Command, CommandOutcome,
    insert_log, insert_log_with_message, delete_all_logs, comment_all_logs, uncomment_all_logs,
    locate_statement_end,
};
pub use file::{FileContent, FileError, read_file, write_file};
pub use json::{CommandReport, generate_execution_id, resolve_execution_id};
