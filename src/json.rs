use serde::Serialize;
use uuid::Uuid;

use crate::commands::CommandOutcome;
use crate::position::Position;

/// Structured result of one command run, printed with `--json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReport {
    /// Identifier of this run
    pub execution_id: String,
    /// Command identifier, e.g. `debugtrace.insertLog`
    pub command: String,
    /// File the command ran against
    pub file: String,
    /// Whether the command ran without error
    pub success: bool,
    /// What the command did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CommandOutcome>,
    /// Statement end reported by `locate`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_end: Option<Position>,
    /// Messages the command showed to the user
    pub notifications: Vec<String>,
    /// Checksum before the command ran
    pub checksum_before: String,
    /// Checksum after the command ran
    pub checksum_after: String,
    /// Whether the file on disk was rewritten
    pub written: bool,
    /// Error message (only present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandReport {
    pub fn new(execution_id: String, command: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            execution_id,
            command: command.into(),
            file: file.into(),
            success: true,
            outcome: None,
            statement_end: None,
            notifications: Vec::new(),
            checksum_before: String::new(),
            checksum_after: String::new(),
            written: false,
            error: None,
        }
    }

    /// Mark the report as failed with `error`
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        if let Some(error) = &self.error {
            return format!("Error: {}", error);
        }

        match &self.outcome {
            Some(CommandOutcome::Inserted { at, .. }) => format!("Inserted log statement at line {}", at.line + 1),
            Some(CommandOutcome::Aborted) => "Cancelled: no log message given".to_string(),
            Some(CommandOutcome::NoEditor) => "No document open".to_string(),
            Some(CommandOutcome::Changed { .. }) | Some(CommandOutcome::NoneFound) => {
                self.notifications.join("\n")
            }
            None => match self.statement_end {
                Some(end) => format!("Log statement would be inserted at line {}", end.line + 1),
                None => String::new(),
            },
        }
    }
}

/// Resolve a requested execution id, generating one for `auto`
pub fn resolve_execution_id(requested: &str) -> String {
    if requested == "auto" {
        generate_execution_id()
    } else {
        requested.to_string()
    }
}

/// Generate a unique execution id (UUID v4)
pub fn generate_execution_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_execution_id_is_uuid() {
        let id = generate_execution_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, generate_execution_id());
    }

    #[test]
    fn test_resolve_execution_id() {
        assert_eq!(resolve_execution_id("run-42"), "run-42");
        assert!(Uuid::parse_str(&resolve_execution_id("auto")).is_ok());
    }

    #[test]
    fn test_report_serializes_outcome() {
        let mut report = CommandReport::new("id".to_string(), "debugtrace.deleteAllLogs", "a.dart");
        report.outcome = Some(CommandOutcome::Changed { count: 3 });
        report.notifications.push("Deleted 3 DebugTrace log statement(s).".to_string());

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["outcome"]["outcome"], "changed");
        assert_eq!(json["outcome"]["count"], 3);
        assert!(json.get("error").is_none());
        assert_eq!(report.summary(), "Deleted 3 DebugTrace log statement(s).");
    }

    #[test]
    fn test_failed_report_summary() {
        let report = CommandReport::new("id".to_string(), "debugtrace.insertLog", "a.dart").failed("boom");

        assert!(!report.success);
        assert_eq!(report.summary(), "Error: boom");
    }

    #[test]
    fn test_inserted_summary_is_one_indexed() {
        let mut report = CommandReport::new("id".to_string(), "debugtrace.insertLog", "a.dart");
        report.outcome = Some(CommandOutcome::Inserted {
            at: Position::new(4, 0),
            text: "print('x');\n".to_string(),
        });

        assert_eq!(report.summary(), "Inserted log statement at line 5");
    }
}
