//! Validate command implementation

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use tracing::info;

use crate::cli::error::CliError;
use crate::cli::output::{format_summary, render_result};
use crate::engine::{Engine, ValidationOptions, ValidationReport};
use crate::report::Status;
use crate::schema::load_schema;

/// Arguments for the validate command
#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    /// CSV file path, or `-` for stdin
    pub input: String,
    /// Schema file (.json, .yaml or .yml)
    pub schema: PathBuf,
    /// Field delimiter; `tab` or `\t` for tabs
    pub delimiter: Option<String>,
    /// Quote character
    pub quote: Option<String>,
    pub max_errors: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub max_rows: Option<usize>,
    pub min_rows: Option<usize>,
    /// Rows per parallel batch
    pub batch_size: Option<usize>,
    /// Indent the JSON output
    pub pretty: bool,
    /// Print a human-readable summary on stderr
    pub summary: bool,
}

/// Open the input file or stdin
fn open_input(input: &str) -> Result<Box<dyn Read>, CliError> {
    if input == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        let path = PathBuf::from(input);
        let file = File::open(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))?;
        Ok(Box::new(file))
    }
}

/// Parse a single-character argument, accepting `tab` and `\t` for a tab
fn parse_char(name: &str, value: &str) -> Result<char, CliError> {
    if value == "tab" || value == "\\t" {
        return Ok('\t');
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CliError::InvalidArgument(format!(
            "{} must be a single character, got '{}'",
            name, value
        ))),
    }
}

/// Translate command-line arguments into engine options
pub fn build_options(args: &ValidateArgs) -> Result<ValidationOptions, CliError> {
    let mut builder = ValidationOptions::builder();
    if let Some(delimiter) = &args.delimiter {
        builder = builder.delimiter(parse_char("--delimiter", delimiter)?);
    }
    if let Some(quote) = &args.quote {
        builder = builder.quote_char(parse_char("--quote", quote)?);
    }
    if let Some(max) = args.max_errors {
        builder = builder.max_errors(max);
    }
    if let Some(timeout) = args.timeout_ms {
        builder = builder.timeout_ms(timeout);
    }
    if let Some(max) = args.max_rows {
        builder = builder.max_rows(max);
    }
    if let Some(min) = args.min_rows {
        builder = builder.min_rows(min);
    }
    if let Some(size) = args.batch_size {
        builder = builder.parallel_batch_size(size);
    }

    let options = builder.build();
    options.validate()?;
    Ok(options)
}

/// Run a validation and write the wire JSON to `out`
pub fn run_validate<W: Write>(args: &ValidateArgs, out: &mut W) -> Result<ValidationReport, CliError> {
    let schema = load_schema(&args.schema)?;
    let options = build_options(args)?;
    let input = open_input(&args.input)?;

    info!(input = %args.input, schema = %args.schema.display(), "Validating");
    let report = Engine::with_options(options).run(input, &schema)?;

    writeln!(out, "{}", render_result(&report.result, args.pretty)?)?;
    Ok(report)
}

/// Handle the validate command, printing the result on stdout
pub fn handle_validate(args: &ValidateArgs) -> Result<Status, CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run_validate(args, &mut out)?;
    out.flush()?;

    if args.summary {
        eprintln!("{}", format_summary(&report));
    }
    Ok(report.result.status())
}
