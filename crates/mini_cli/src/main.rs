//! mini-query: compile mini notation and print the events it produces.
//!
//! ```text
//! mini-query "c e [g a]"
//! mini-query --raw 'scale "C4 minor" $ "0 2 4"' --cycles 2
//! mini-query --ast-json tree.json --format json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;

use mini_core::mini::{Compilation, Compiler, Severity, ast};
use mini_core::pattern_system::Hap;
use mini_core::theory::Pitch;
use mini_core::{CompilerConfig, Value};

/// Compile mini notation and list the resulting pattern events
#[derive(Parser)]
#[command(name = "mini-query")]
#[command(version)]
struct Cli {
    /// Mini notation, raw notation with --raw, or a JSON file path with --ast-json
    notation: String,

    /// Parse NOTATION as raw notation (`slow 2 $ "c e"`)
    #[arg(long, conflicts_with = "ast_json")]
    raw: bool,

    /// Read NOTATION as a path to a JSON syntax tree
    #[arg(long)]
    ast_json: bool,

    /// Number of cycles to query
    #[arg(short, long, default_value = "1")]
    cycles: u32,

    /// First cycle to query
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    from: i64,

    /// Output format
    #[arg(long, default_value = "table")]
    format: OutputFormat,

    /// Compiler config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the maximum nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Override the default scale tonic (e.g. "Eb3")
    #[arg(long)]
    tonic: Option<String>,

    /// Increase log verbosity (-v warn, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Serialize)]
struct EventRow {
    cycle: i64,
    begin: String,
    end: String,
    onset: bool,
    value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<(usize, usize)>,
}

impl EventRow {
    fn new(cycle: i64, hap: &Hap<Value>) -> Self {
        let span = hap.whole_or_part();
        EventRow {
            cycle,
            begin: span.begin.to_string(),
            end: span.end.to_string(),
            onset: hap.has_onset(),
            value: hap.value.clone(),
            source: hap.context.source_span.map(|s| s.to_tuple()),
        }
    }
}

#[derive(Serialize)]
struct Report {
    events: Vec<EventRow>,
    diagnostics: Vec<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<CompilerConfig> {
    let mut config = match &cli.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default(),
    };
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(tonic) = &cli.tonic {
        config.default_tonic = Pitch::parse(tonic)?;
    }
    Ok(config)
}

fn compile(cli: &Cli, compiler: &Compiler) -> Result<Compilation> {
    if cli.ast_json {
        let json = std::fs::read_to_string(&cli.notation)
            .with_context(|| format!("failed to read {}", cli.notation))?;
        let tree = ast::from_json(&json)?;
        return Ok(compiler.compile(&tree));
    }
    let compilation = if cli.raw {
        compiler.raw(&cli.notation)?
    } else {
        compiler.mini(&cli.notation)?
    };
    Ok(compilation)
}

fn collect_events(compilation: &Compilation, from: i64, cycles: u32) -> Result<Vec<EventRow>> {
    let until = from
        .checked_add(i64::from(cycles))
        .with_context(|| format!("--from {} plus {} cycles overflows", from, cycles))?;
    Ok((from..until)
        .flat_map(|cycle| {
            compilation
                .pattern
                .query_cycle(cycle)
                .iter()
                .map(|hap| EventRow::new(cycle, hap))
                .collect::<Vec<_>>()
        })
        .collect())
}

fn print_table(events: &[EventRow], compilation: &Compilation) {
    println!(
        "{:>6} {:>10} {:>10}  {:<12} {}",
        "cycle", "begin", "end", "value", "source"
    );
    println!("{}", "-".repeat(56));

    for event in events {
        let source = event
            .source
            .map(|(start, end)| format!("{}..{}", start, end))
            .unwrap_or_default();
        let value = format!("{:<12}", event.value.to_string());
        let value = if event.onset { value.cyan() } else { value.dimmed() };
        println!(
            "{:>6} {:>10} {:>10}  {} {}",
            event.cycle.to_string().dimmed(),
            event.begin.yellow(),
            event.end.yellow(),
            value,
            source.dimmed()
        );
    }
    println!("{}", "-".repeat(56));
    println!("{} events", events.len());

    for diagnostic in compilation.diagnostics.snapshot() {
        let label = match diagnostic.severity() {
            Severity::Warning => "warning".yellow().bold(),
            Severity::Error => "error".red().bold(),
        };
        println!("{}: {}", label, diagnostic);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let compiler = Compiler::new(config);
    let compilation = compile(&cli, &compiler)?;

    // Scale diagnostics are raised while querying, so query before printing them.
    let events = collect_events(&compilation, cli.from, cli.cycles)?;
    tracing::debug!(events = events.len(), from = cli.from, cycles = cli.cycles, "queried pattern");

    match cli.format {
        OutputFormat::Table => print_table(&events, &compilation),
        OutputFormat::Json => {
            let report = Report {
                events,
                diagnostics: compilation
                    .diagnostics
                    .snapshot()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
