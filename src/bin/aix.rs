//! AIX CLI Binary
//!
//! Command-line interface for parsing and validating agent definitions.

use aix::{AgentParser, AixError, ParsedAgent, ParserConfig, Severity};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "aix", version, about = "Parse and validate declarative agent definitions")]
struct Cli {
    /// Path to a parser configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and print the normalized agent as JSON
    Parse {
        path: PathBuf,
        /// Enable the natural-language backend
        #[arg(long)]
        natural: bool,
        /// Collect errors as diagnostics instead of failing on them
        #[arg(long)]
        lenient: bool,
    },
    /// Validate a document and print its diagnostics
    Validate {
        path: PathBuf,
        /// Enable the natural-language backend
        #[arg(long)]
        natural: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    aix::logging::init_logging(cli.verbose);

    if let Err(code) = run(cli).await {
        process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<(), i32> {
    let mut config = match cli.config.as_deref() {
        Some(path) => ParserConfig::load(Some(path)).map_err(|err| {
            eprintln!("{} {}", "error:".red().bold(), err);
            2
        })?,
        None => ParserConfig::default(),
    };

    match cli.command {
        Commands::Parse {
            path,
            natural,
            lenient,
        } => {
            config.enable_natural_language |= natural;
            if lenient {
                config.strict_mode = false;
            }
            let parser = AgentParser::new(config);
            let agent = parser.parse_path(&path).await.map_err(report_error)?;

            let rendered = serde_json::to_string_pretty(agent.document()).map_err(|err| {
                eprintln!("{} {}", "error:".red().bold(), err);
                2
            })?;
            println!("{rendered}");
            Ok(())
        }
        Commands::Validate { path, natural } => {
            config.enable_natural_language |= natural;
            // Validation always collects; the exit code reflects errors.
            config.strict_mode = false;
            let parser = AgentParser::new(config);
            let agent = parser.parse_path(&path).await.map_err(report_error)?;

            print_diagnostics(&agent);
            if agent.diagnostics().has_errors() {
                Err(1)
            } else {
                Ok(())
            }
        }
    }
}

fn print_diagnostics(agent: &Arc<ParsedAgent>) {
    println!("Source: {} ({})\n", agent.source(), agent.format());

    let diagnostics = agent.diagnostics();
    if diagnostics.is_empty() {
        println!("No diagnostics.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Severity", "Code", "Message"]);
    for record in diagnostics.records() {
        table.add_row(vec![
            severity_label(record.severity),
            record.code.clone(),
            record.message.clone(),
        ]);
    }
    println!("{table}\n");

    println!(
        "Total: {} error(s), {} warning(s), {} fix(es).",
        diagnostics.error_count(),
        diagnostics.warning_count(),
        diagnostics.fix_count()
    );
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Error => "error".red().bold().to_string(),
        Severity::Warning => "warning".yellow().to_string(),
        Severity::Info => "info".dimmed().to_string(),
        Severity::Fix => "fix".green().to_string(),
    }
}

fn report_error(err: AixError) -> i32 {
    eprintln!("{} {}", "error:".red().bold(), err);
    if let Some(suggestion) = err.suggestion() {
        eprintln!("{} {}", "hint:".yellow(), suggestion);
    }
    1
}
