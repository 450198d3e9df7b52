use crate::config::LogConfig;

/// Line placed after a log statement when separators are enabled
pub const SEPARATOR_LINE: &str = "// ----";

/// Message body used when there is nothing to log
pub const DEBUG_POINT: &str = "Debug point";

/// Last component of a document path, or `unknown`
///
/// # Examples
/// ```
/// use debugtrace::display_file_name;
/// assert_eq!(display_file_name("lib/src/main.dart"), "main.dart");
/// assert_eq!(display_file_name(""), "unknown");
/// ```
pub fn display_file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("unknown")
}

/// Build the message text that goes inside the log call
pub fn format_message(
    config: &LogConfig,
    file_name: &str,
    line_number: usize,
    variable_or_message: Option<&str>,
    is_custom_message: bool,
) -> String {
    let body = match variable_or_message.filter(|text| !text.is_empty()) {
        Some(message) if is_custom_message => message.to_string(),
        Some(variable) => format!("{}: ${{{}}}", variable, variable),
        None => DEBUG_POINT.to_string(),
    };

    if config.include_file_info {
        format!("{} [{}:{}] {}", config.log_message_prefix, file_name, line_number, body)
    } else {
        format!("{} {}", config.log_message_prefix, body)
    }
}

/// Build a complete log statement, e.g. `print('DebugTrace🔎: [a.dart:3] x: ${x}');`
pub fn format_log_statement(
    config: &LogConfig,
    file_name: &str,
    line_number: usize,
    variable_or_message: Option<&str>,
    is_custom_message: bool,
) -> String {
    let message = format_message(config, file_name, line_number, variable_or_message, is_custom_message);
    format!("{}('{}');", config.log_type, message)
}

/// Text to insert for `statement`: one indented line, plus a separator line if enabled
pub fn insertion_text(config: &LogConfig, indentation: &str, statement: &str) -> String {
    if config.add_separator_line {
        format!("{indentation}{statement}\n{indentation}{SEPARATOR_LINE}\n")
    } else {
        format!("{indentation}{statement}\n")
    }
}
