//! csv-validate: validate a CSV file against a schema and print the result

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use csv_validation_engine::Status;
use csv_validation_engine::cli::commands::{ValidateArgs, handle_validate};
use tracing_subscriber::EnvFilter;

/// Validate a CSV file against a schema.
///
/// Prints the JSON result on stdout. Exits 0 when the file passes, 1 when it
/// fails validation and 2 on any other error.
#[derive(Parser, Debug)]
#[command(name = "csv-validate", version, about)]
struct Cli {
    /// CSV file to validate, or `-` for stdin
    input: String,

    /// Schema file (.json, .yaml or .yml)
    #[arg(short, long)]
    schema: PathBuf,

    /// Field delimiter (`tab` for tab-separated files)
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Quote character
    #[arg(short, long)]
    quote: Option<String>,

    /// Stop after this many errors
    #[arg(long)]
    max_errors: Option<usize>,

    /// Stop after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Validate at most this many data rows
    #[arg(long)]
    max_rows: Option<usize>,

    /// Require at least this many data rows
    #[arg(long)]
    min_rows: Option<usize>,

    /// Rows per parallel batch (needs the `parallel` feature)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print a summary on stderr
    #[arg(long)]
    summary: bool,

    /// Log debug output on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = ValidateArgs {
        input: cli.input,
        schema: cli.schema,
        delimiter: cli.delimiter,
        quote: cli.quote,
        max_errors: cli.max_errors,
        timeout_ms: cli.timeout_ms,
        max_rows: cli.max_rows,
        min_rows: cli.min_rows,
        batch_size: cli.batch_size,
        pretty: cli.pretty,
        summary: cli.summary,
    };

    match handle_validate(&args) {
        Ok(Status::Pass) => ExitCode::SUCCESS,
        Ok(Status::Fail) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
