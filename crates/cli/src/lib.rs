use anyhow::{Context as AnyhowContext, Result};
use bpmn_protocol::{serialize_json, ErrorCode};
use clap::{Args, Parser, Subcommand};
use command::{
    CommandAction, CommandRequest, CommandResponse, ScanOutput, ScanPayload, SearchOutput,
    SearchPayload,
};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

pub mod command;
pub mod config;
mod report;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "bpmn-finder")]
#[command(about = "Structural search over BPMN process definitions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find call activities that invoke a process id
    Refs(RefsArgs),

    /// Find text in scripts, call activities and condition expressions
    Text(TextArgs),

    /// List the documents a search would read
    Scan(ScanArgs),

    /// Execute a JSON Command API request
    Command(CommandArgs),
}

#[derive(Args)]
struct SearchFlags {
    /// Directory to search (default: $BPMN_FINDER_ROOT, then the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Keep results whose folder, file or process name contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Only files whose relative path contains this text or matches this glob
    #[arg(long)]
    pattern: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Results per page (overrides config)
    #[arg(long)]
    page_size: Option<usize>,

    /// Include raw document XML in JSON output
    #[arg(long)]
    with_content: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RefsArgs {
    /// Called process id, matched exactly
    process_id: String,

    #[command(flatten)]
    flags: SearchFlags,
}

#[derive(Args)]
struct TextArgs {
    /// Text to look for, case-insensitive
    query: String,

    #[command(flatten)]
    flags: SearchFlags,
}

#[derive(Args)]
struct ScanArgs {
    /// Directory to scan (default: $BPMN_FINDER_ROOT, then the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Only files whose relative path contains this text or matches this glob
    #[arg(long)]
    pattern: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON payload (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing JSON payload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout carries JSON for these, keep logs quiet
    let json_output = match &cli.command {
        Commands::Command(_) => true,
        Commands::Refs(args) => args.flags.json,
        Commands::Text(args) => args.flags.json,
        Commands::Scan(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Command(args) => run_command(args).await?,
        Commands::Refs(args) => {
            run_search(CommandAction::ReferenceSearch, args.process_id, args.flags).await?
        }
        Commands::Text(args) => run_search(CommandAction::TextSearch, args.query, args.flags).await?,
        Commands::Scan(args) => run_scan(args).await?,
    }

    Ok(())
}

async fn run_command(args: CommandArgs) -> Result<()> {
    let raw = read_payload(&args)?;
    let response = match serde_json::from_str::<CommandRequest>(&raw) {
        Ok(request) => command::execute(request).await,
        Err(err) => command::envelope_response(
            ErrorCode::InvalidRequest,
            format!("Invalid JSON passed to --json/--file: {err}"),
            Some("Expected {\"action\": \"reference_search\" | \"text_search\" | \"scan\", \"payload\": {...}}".to_string()),
            0,
        ),
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serialize_json(&response)?
    };
    print_stdout(&output)?;

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Command request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

async fn run_search(action: CommandAction, query: String, flags: SearchFlags) -> Result<()> {
    let payload = SearchPayload {
        query,
        root: flags.root,
        filter: flags.filter,
        page: Some(flags.page),
        page_size: flags.page_size,
        file_pattern: flags.pattern,
        include_content: flags.with_content,
    };
    let request = CommandRequest {
        action,
        payload: serde_json::to_value(payload)?,
    };

    let response = command::execute(request).await;

    if flags.json {
        print_stdout(&serde_json::to_string_pretty(&response)?)?;
        if response.is_error() {
            std::process::exit(1);
        }
        return Ok(());
    }
    exit_on_error(&response);

    let out: SearchOutput =
        serde_json::from_value(response.data).context("Malformed search output")?;
    print_stdout(report::render_search(&out, &response.meta).trim_end())?;
    Ok(())
}

async fn run_scan(args: ScanArgs) -> Result<()> {
    let request = CommandRequest {
        action: CommandAction::Scan,
        payload: serde_json::to_value(ScanPayload {
            root: args.root,
            file_pattern: args.pattern,
        })?,
    };

    let response = command::execute(request).await;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&response)?)?;
        if response.is_error() {
            std::process::exit(1);
        }
        return Ok(());
    }
    exit_on_error(&response);

    let out: ScanOutput = serde_json::from_value(response.data).context("Malformed scan output")?;
    print_stdout(report::render_scan(&out, &response.meta).trim_end())?;
    Ok(())
}

fn exit_on_error(response: &CommandResponse) {
    if response.is_error() {
        eprintln!(
            "Error: {}",
            response.message.as_deref().unwrap_or("Unknown error")
        );
        if let Some(hint) = response.error.as_ref().and_then(|e| e.hint.as_deref()) {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
}
