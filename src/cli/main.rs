//! esm CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use event_schema_miner::cli::commands::ScanOptions;
use event_schema_miner::cli::commands::diff::{DiffArgs, handle_diff};
use event_schema_miner::cli::commands::discover::{DiscoverArgs, handle_discover};
use event_schema_miner::cli::commands::scan::{ScanArgs, handle_scan};
use event_schema_miner::cli::output::OutputFormat;

/// Discover event schemas from JSONL stream captures
#[derive(Parser, Debug)]
#[command(name = "esm", version, about)]
struct Cli {
    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan captures and write schemas, field index and reports
    Discover {
        /// Capture file or directory
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Field dictionary (Markdown) to diff against
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// Schema and index document format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Also write schema_chunks.jsonl for embedding
        #[arg(long)]
        chunks: bool,

        /// Protocol name used in chunk overviews
        #[arg(long)]
        protocol: Option<String>,

        #[command(flatten)]
        scan: ScanFlags,
    },

    /// Print a corpus summary
    Scan {
        /// Capture file or directory
        input: PathBuf,

        /// Print the coverage report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        scan: ScanFlags,
    },

    /// Compare discovered fields against a field dictionary
    Diff {
        /// Capture file or directory
        input: PathBuf,

        /// Field dictionary (Markdown)
        #[arg(long)]
        dictionary: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanFlags,
    },
}

#[derive(Args, Debug)]
struct ScanFlags {
    /// Discovery config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Capture file glob pattern inside a directory
    #[arg(long)]
    pattern: Option<String>,

    /// Maximum nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Sample values kept per field path
    #[arg(long)]
    max_samples: Option<usize>,

    /// Field carrying the event type
    #[arg(long)]
    event_field: Option<String>,

    /// Scan files sequentially
    #[arg(long)]
    no_parallel: bool,

    /// Hide the progress spinner
    #[arg(short, long)]
    quiet: bool,
}

impl From<ScanFlags> for ScanOptions {
    fn from(flags: ScanFlags) -> Self {
        ScanOptions {
            config: flags.config,
            pattern: flags.pattern,
            max_depth: flags.max_depth,
            max_samples: flags.max_samples,
            event_field: flags.event_field,
            no_parallel: flags.no_parallel,
            quiet: flags.quiet,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let outcome = match cli.command {
        Command::Discover {
            input,
            output,
            dictionary,
            format,
            chunks,
            protocol,
            scan,
        } => handle_discover(&DiscoverArgs {
            input,
            output_dir: output,
            dictionary,
            format,
            chunks,
            protocol,
            options: scan.into(),
        }),
        Command::Scan { input, json, scan } => handle_scan(&ScanArgs {
            input,
            json,
            options: scan.into(),
        }),
        Command::Diff {
            input,
            dictionary,
            output,
            scan,
        } => handle_diff(&DiffArgs {
            input,
            dictionary,
            output,
            options: scan.into(),
        }),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
