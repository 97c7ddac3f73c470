mod bench;
mod column;
mod parse;

use std::io::stderr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse timestamps and print their components.
    ///
    /// Timestamps must have the layout YYYY-MM-DD HH:MM:SS.fff and may stop after the
    /// year, day, minute or seconds.
    Parse {
        /// Only consider the first N bytes of each timestamp.
        #[arg(short, long, value_name = "N")]
        max_len: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: parse::Format,

        /// Timestamps to parse.
        #[arg(required = true)]
        timestamps: Vec<String>,
    },
    /// Parse a single timestamp many times and report the time per parse.
    Bench {
        /// Number of times to parse the timestamp.
        #[arg(short = 'n', long, default_value_t = 10_000_000)]
        iterations: u64,

        /// Timestamp to parse.
        timestamp: String,
    },
    /// Parse a file containing a column of fixed width timestamp cells.
    ///
    /// Cells may be padded with zero bytes. One timestamp, or error, is written per row.
    Column {
        /// Width of each cell in bytes.
        #[arg(short, long)]
        width: usize,

        /// Cells contain 4 byte little-endian characters (numpy unicode arrays).
        #[arg(long, action)]
        ucs4: bool,

        /// Number of parser threads. 0 uses one per CPU.
        #[arg(short, long, default_value_t = 0)]
        threads: usize,

        /// Fail on the first row that cannot be parsed.
        #[arg(long, action)]
        strict: bool,

        /// Input file.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("FIXEDTIME_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    debug!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Parse {
            max_len,
            format,
            timestamps,
        } => parse::parse(timestamps, *max_len, format),
        Commands::Bench {
            iterations,
            timestamp,
        } => bench::bench(timestamp, *iterations),
        Commands::Column {
            width,
            ucs4,
            threads,
            strict,
            input,
        } => column::column(input, *width, *ucs4, *threads, *strict),
    }
}
