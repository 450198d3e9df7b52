use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use debugtrace::{
    Command, CommandReport, ConfigProvider, JsonSettings, LayeredConfig, LogConfig, MemoryHost,
    Position, locate_statement_end, read_file, resolve_execution_id, write_file,
};
use std::fs;
use std::io;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Insert, remove and toggle debug log statements in source files
#[derive(Parser, Debug)]
#[command(name = "debugtrace")]
#[command(version = "0.1.0")]
#[command(about = "Insert, remove and toggle debug log statements", long_about = None)]
struct Args {
    /// Source file to work on
    #[arg(short, long)]
    file: String,

    /// VS Code style settings.json to read `debugtrace.*` keys from
    #[arg(short, long)]
    settings: Option<String>,

    /// Log function to call (overrides settings)
    #[arg(long)]
    log_type: Option<String>,

    /// Message prefix (overrides settings)
    #[arg(long)]
    prefix: Option<String>,

    /// Include `[file:line]` in messages (overrides settings)
    #[arg(long)]
    include_file_info: Option<bool>,

    /// Add a `// ----` line after inserted statements (overrides settings)
    #[arg(long)]
    separator: Option<bool>,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Compute the result without rewriting the source file
    #[arg(long)]
    dry_run: bool,

    /// Refuse to run unless the file has this BLAKE3 checksum
    #[arg(long)]
    expected_checksum: Option<String>,

    /// Identifier echoed in the report ("auto" generates one)
    #[arg(long, default_value = "auto")]
    execution_id: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Insert a log statement for the expression at the cursor or selection
    Insert {
        /// Cursor line (1-based)
        #[arg(long)]
        line: usize,
        /// Cursor column (1-based)
        #[arg(long)]
        column: usize,
        /// Selection end line (1-based); the cursor is the selection start
        #[arg(long, requires = "end_column")]
        end_line: Option<usize>,
        /// Selection end column (1-based)
        #[arg(long, requires = "end_line")]
        end_column: Option<usize>,
    },
    /// Insert a log statement carrying a custom message
    InsertMessage {
        /// Cursor line (1-based)
        #[arg(long)]
        line: usize,
        /// Cursor column (1-based)
        #[arg(long)]
        column: usize,
        /// Message text (read from stdin when omitted)
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Delete all log statements and their separator lines
    Delete,
    /// Comment out all log statements
    Comment,
    /// Uncomment all commented log statements
    Uncomment,
    /// Report where a log statement for this line would be inserted
    Locate {
        /// Cursor line (1-based)
        #[arg(long)]
        line: usize,
        /// Cursor column (1-based)
        #[arg(long, default_value_t = 1)]
        column: usize,
    },
}

impl CliCommand {
    fn command(&self) -> Option<Command> {
        match self {
            CliCommand::Insert { .. } => Some(Command::InsertLog),
            CliCommand::InsertMessage { .. } => Some(Command::InsertLogWithMessage),
            CliCommand::Delete => Some(Command::DeleteAllLogs),
            CliCommand::Comment => Some(Command::CommentAllLogs),
            CliCommand::Uncomment => Some(Command::UncommentAllLogs),
            CliCommand::Locate { .. } => None,
        }
    }

    fn name(&self) -> &'static str {
        self.command().map(|c| c.id()).unwrap_or("debugtrace.locate")
    }
}

/// Convert 1-based CLI coordinates to a position
fn to_position(line: usize, column: usize) -> anyhow::Result<Position> {
    if line == 0 || column == 0 {
        bail!("Lines and columns are 1-based, got {}:{}", line, column);
    }
    Ok(Position::new(line - 1, column - 1))
}

/// Build the configuration snapshot: flags over settings file over defaults
fn load_config(args: &Args) -> anyhow::Result<LogConfig> {
    let settings = match &args.settings {
        Some(path) => JsonSettings::load_from_path(path)?,
        None => JsonSettings::default(),
    };

    let mut flags = JsonSettings::default();
    if let Some(log_type) = &args.log_type {
        flags = flags.with("logType", log_type.as_str());
    }
    if let Some(prefix) = &args.prefix {
        flags = flags.with("logMessagePrefix", prefix.as_str());
    }
    if let Some(include) = args.include_file_info {
        flags = flags.with("includeFileInfo", include);
    }
    if let Some(separator) = args.separator {
        flags = flags.with("addSeparatorLine", separator);
    }

    let layers: Vec<&dyn ConfigProvider> = vec![&flags, &settings];
    Ok(LogConfig::from_provider(&LayeredConfig::new(layers)))
}

/// Read the custom message from stdin; an empty line means cancelled
fn read_message_from_stdin() -> io::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_line(&mut buffer)?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn run(args: &Args, execution_id: String) -> anyhow::Result<CommandReport> {
    let file_content =
        read_file(&args.file).with_context(|| format!("Failed to read file '{}'", args.file))?;

    if let Some(expected) = &args.expected_checksum {
        if *expected != file_content.checksum {
            bail!("Checksum mismatch: expected {}, got {}", expected, file_content.checksum);
        }
    }

    let config = load_config(args)?;
    debug!(?config, "configuration loaded");

    let mut report = CommandReport::new(execution_id, args.command.name(), &file_content.path);
    report.checksum_before = file_content.checksum.clone();

    let host = MemoryHost::new(file_content.document);
    let mut host = match &args.command {
        CliCommand::Insert { line, column, end_line, end_column } => {
            let cursor = to_position(*line, *column)?;
            match (end_line, end_column) {
                (Some(end_line), Some(end_column)) => {
                    host.with_selection(cursor, to_position(*end_line, *end_column)?)
                }
                _ => host.with_cursor(cursor),
            }
        }
        CliCommand::InsertMessage { line, column, message } => {
            let message = match message {
                Some(message) => message.clone(),
                None => read_message_from_stdin().context("Failed to read message from stdin")?,
            };
            host.with_cursor(to_position(*line, *column)?).with_prompt_answer(message)
        }
        CliCommand::Locate { line, column } => {
            let host = host.with_cursor(to_position(*line, *column)?);
            report.statement_end = locate_statement_end(&host);
            report.checksum_after = report.checksum_before.clone();
            return Ok(report);
        }
        CliCommand::Delete | CliCommand::Comment | CliCommand::Uncomment => host,
    };

    let Some(command) = args.command.command() else {
        bail!("No editor command for {}", args.command.name());
    };
    let outcome = command.run(&mut host, &config)?;

    report.notifications = host.notifications().to_vec();
    let changed = !host.batches().is_empty();
    let document = host
        .into_document()
        .context("Document closed while the command was running")?;
    report.checksum_after = document.checksum();

    if changed && !args.dry_run {
        write_file(&args.file, &document)
            .with_context(|| format!("Failed to write file '{}'", args.file))?;
        report.written = true;
    }

    report.outcome = Some(outcome);
    Ok(report)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debugtrace=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let execution_id = resolve_execution_id(&args.execution_id);

    let report = match run(&args, execution_id.clone()) {
        Ok(report) => report,
        Err(e) => CommandReport::new(execution_id, args.command.name(), &args.file).failed(format!("{:#}", e)),
    };

    output_report(&report, args.json, args.output.as_ref());

    if !report.success {
        std::process::exit(1);
    }
}

/// Format and output the report
fn output_report(report: &CommandReport, json_mode: bool, output_path: Option<&String>) {
    let output = if json_mode {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| {
            r#"{"error": "Failed to serialize report"}"#.to_string()
        })
    } else if report.success {
        format!("{}\nFinal checksum: {}", report.summary(), report.checksum_after)
    } else {
        report.summary()
    };

    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, &output) {
            eprintln!("Failed to write output to '{}': {}", path, e);
            std::process::exit(1);
        }
    } else {
        println!("{}", output);
    }
}
