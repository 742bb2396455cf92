//! Convert a CSV file to JSON using a YAML schema.
//!
//! Usage:
//!   ironcast <input.csv> <schema.yaml> <output.json>
//!   ironcast <input.csv> <schema.yaml> <output.jsonl> --format jsonl --workers 8
//!
//! Log verbosity follows `RUST_LOG` (default `ironcast=info`).

use anyhow::{Context, Result, bail};
use clap::Parser;
use ironcast::{ConvertOptions, Converter, OutputFormat, Schema, write_records};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ironcast")]
#[command(about = "Schema-driven CSV to JSON converter")]
#[command(version)]
struct Cli {
    /// Input CSV file (may be compressed)
    input: PathBuf,
    /// YAML schema describing the output fields
    schema: PathBuf,
    /// Output file; parent directories are created
    output: PathBuf,
    /// Number of worker threads (default: available CPUs)
    #[arg(long, short)]
    workers: Option<usize>,
    /// Bound the dispatch queue to this many pending rows
    #[arg(long)]
    queue_capacity: Option<usize>,
    /// Field delimiter
    #[arg(long, short, default_value_t = ',')]
    delimiter: char,
    /// Output layout: json or jsonl
    #[arg(long, short, default_value = "json")]
    format: OutputFormat,
    /// Also save run statistics as JSON
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ironcast=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got {:?}", cli.delimiter);
    }

    let schema = Schema::from_yaml_file(&cli.schema)
        .with_context(|| format!("load schema {}", cli.schema.display()))?;

    let mut options = ConvertOptions::default().queue_capacity(cli.queue_capacity);
    if let Some(workers) = cli.workers {
        options = options.workers(workers);
    }

    let converter = Converter::new(schema, options)?;
    let conversion = converter
        .run_csv(&cli.input, cli.delimiter as u8)
        .with_context(|| format!("convert {}", cli.input.display()))?;

    let written = write_records(&cli.output, &conversion.records, cli.format)?;
    info!(records = written, output = %cli.output.display(), "output written");

    conversion.stats.print();
    if let Some(path) = &cli.stats_out {
        conversion.stats.save_to_file(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
