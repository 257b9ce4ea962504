//! Validation run driver

use std::io::Read;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use super::config::ValidationOptions;
use super::error::EngineResult;
use crate::pipeline::ValidationPipeline;
use crate::report::{ErrorAggregator, FileIssue, Flow, ValidationError, ValidationResult};
use crate::schema::{Schema, SchemaRegistry};
use crate::tokenizer::{TokenizedRow, Tokenizer};

/// Why a run stopped pulling rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// Every row was read
    #[default]
    Exhausted,
    /// The error cap was hit
    ErrorLimit,
    /// The time budget ran out
    TimedOut,
    /// The row ceiling was hit with rows remaining
    RowLimit,
}

impl Termination {
    /// Whether the run stopped before the end of the input
    pub fn is_partial(&self) -> bool {
        !matches!(self, Termination::Exhausted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Exhausted => "exhausted",
            Termination::ErrorLimit => "error_limit",
            Termination::TimedOut => "timed_out",
            Termination::RowLimit => "row_limit",
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Data rows pulled from the tokenizer
    pub rows_read: usize,
    /// Data rows fully validated
    pub rows_validated: usize,
    /// Rows that produced at least one finding
    pub rows_with_errors: usize,
    /// Findings in the result, markers included
    pub errors_reported: usize,
    /// Findings dropped after the error cap
    pub errors_dropped: usize,
    /// Bytes consumed from the input
    pub bytes_read: u64,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Why the run stopped
    pub termination: Termination,
}

/// A validation result together with run statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub result: ValidationResult,
    pub stats: RunStats,
}

/// The validation engine facade.
///
/// Wires tokenizer, schema registry, pipeline and aggregator into one
/// single-pass run. An engine holds only options and can be reused.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: ValidationOptions,
}

impl Engine {
    /// Create an engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom options
    pub fn with_options(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate a CSV stream against a schema
    pub fn validate<R: Read>(&self, input: R, schema: &Schema) -> EngineResult<ValidationResult> {
        Ok(self.run(input, schema)?.result)
    }

    /// Validate a CSV stream and report run statistics alongside the result.
    ///
    /// The input is owned by the run and dropped before this returns, on
    /// success and on failure.
    pub fn run<R: Read>(&self, input: R, schema: &Schema) -> EngineResult<ValidationReport> {
        let dialect = self.options.dialect()?;
        let registry = SchemaRegistry::new(schema)?;

        let _span = info_span!(
            "validation_run",
            columns = registry.len(),
            max_errors = self.options.max_errors
        )
        .entered();

        let start = Instant::now();
        info!(
            delimiter = ?self.options.delimiter,
            timeout_ms = ?self.options.timeout_ms,
            max_rows = ?self.options.max_rows,
            "Starting validation"
        );

        let mut tokenizer = Tokenizer::new(input, dialect);
        let mut aggregator = ErrorAggregator::new(self.options.max_errors);

        let pipeline = match tokenizer.read_header()? {
            Some(header) => {
                aggregator.extend(header.issues().iter().cloned().map(ValidationError::from));
                ValidationPipeline::new(registry, header)
            }
            None => {
                warn!("Input is empty");
                aggregator.push(FileIssue::EmptyFile.into());
                let stats = RunStats {
                    bytes_read: tokenizer.bytes_read(),
                    ..RunStats::default()
                };
                return Ok(self.finish(aggregator, stats, start));
            }
        };
        aggregator.extend(pipeline.binding_issues().into_iter().map(ValidationError::from));

        let mut run = RunState {
            tokenizer,
            pipeline,
            aggregator,
            deadline: self
                .options
                .timeout_ms
                .and_then(|ms| start.checked_add(Duration::from_millis(ms))),
            max_rows: self.options.max_rows,
            rows_read: 0,
            rows_with_errors: 0,
        };

        let termination = if run.aggregator.is_saturated() {
            Termination::ErrorLimit
        } else {
            match self.options.parallel_batch_size {
                Some(size) if size > 1 => run.drive_batched(size)?,
                _ => run.drive()?,
            }
        };

        match termination {
            Termination::Exhausted => {
                // Every row was read, so this finding is exempt from the cap
                if let Some(min) = self.options.min_rows {
                    let found = run.pipeline.rows_committed();
                    if found < min {
                        run.aggregator.mark(FileIssue::TooFewRows { found, min });
                    }
                }
            }
            Termination::TimedOut => {
                let timeout_ms = self.options.timeout_ms.unwrap_or_default();
                warn!(timeout_ms, rows_read = run.rows_read, "Validation timed out");
                run.aggregator
                    .mark(FileIssue::ValidationTimedOut { timeout_ms });
            }
            Termination::RowLimit => {
                let max_rows = self.options.max_rows.unwrap_or_default();
                warn!(max_rows, "Row limit reached");
                run.aggregator.mark(FileIssue::RowLimitReached { max_rows });
            }
            Termination::ErrorLimit => {
                warn!(
                    max_errors = self.options.max_errors,
                    rows_read = run.rows_read,
                    "Error limit reached, stopping early"
                );
            }
        }

        let stats = RunStats {
            rows_read: run.rows_read,
            rows_validated: run.pipeline.rows_committed(),
            rows_with_errors: run.rows_with_errors,
            bytes_read: run.tokenizer.bytes_read(),
            termination,
            ..RunStats::default()
        };
        debug!(
            tracked_values = run.pipeline.tracked_values(),
            "Releasing input"
        );
        Ok(self.finish(run.aggregator, stats, start))
    }

    fn finish(
        &self,
        aggregator: ErrorAggregator,
        mut stats: RunStats,
        start: Instant,
    ) -> ValidationReport {
        stats.errors_dropped = aggregator.dropped();
        let result = aggregator.finish();
        stats.errors_reported = result.errors().len();
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            status = %result.status(),
            errors = stats.errors_reported,
            rows_validated = stats.rows_validated,
            termination = stats.termination.as_str(),
            duration_ms = stats.duration_ms,
            "Validation completed"
        );

        ValidationReport { result, stats }
    }
}

/// Validate a CSV stream against a schema with the given options
pub fn validate<R: Read>(
    input: R,
    schema: &Schema,
    options: &ValidationOptions,
) -> EngineResult<ValidationResult> {
    Engine::with_options(options.clone()).validate(input, schema)
}

enum Pull {
    Row(TokenizedRow),
    Stop(Termination),
}

struct RunState<'s, R: Read> {
    tokenizer: Tokenizer<R>,
    pipeline: ValidationPipeline<'s>,
    aggregator: ErrorAggregator,
    deadline: Option<Instant>,
    max_rows: Option<usize>,
    rows_read: usize,
    rows_with_errors: usize,
}

impl<R: Read> RunState<'_, R> {
    /// Pull the next row, checking the deadline and the row ceiling first
    fn pull(&mut self) -> EngineResult<Pull> {
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Ok(Pull::Stop(Termination::TimedOut));
        }

        let next = self.tokenizer.next_row()?;
        let Some(row) = next else {
            return Ok(Pull::Stop(Termination::Exhausted));
        };

        // The ceiling only counts as reached when a further row exists
        if self.max_rows.is_some_and(|max| self.rows_read >= max) {
            return Ok(Pull::Stop(Termination::RowLimit));
        }

        self.rows_read += 1;
        Ok(Pull::Row(row))
    }

    fn record(&mut self, errors: Vec<ValidationError>) -> Flow {
        if errors.is_empty() {
            return Flow::Continue;
        }
        self.rows_with_errors += 1;
        self.aggregator.extend(errors)
    }

    /// One row at a time
    fn drive(&mut self) -> EngineResult<Termination> {
        loop {
            match self.pull()? {
                Pull::Stop(termination) => return Ok(termination),
                Pull::Row(row) => {
                    let errors = self.pipeline.process(&row);
                    if self.record(errors) == Flow::Stop {
                        return Ok(Termination::ErrorLimit);
                    }
                }
            }
        }
    }

    /// Batches of rows, stateless checks across the rayon pool, serial commit
    #[cfg(feature = "parallel")]
    fn drive_batched(&mut self, batch_size: usize) -> EngineResult<Termination> {
        use rayon::prelude::*;

        loop {
            let mut batch = Vec::with_capacity(batch_size);
            let mut stop = None;
            while batch.len() < batch_size {
                match self.pull()? {
                    Pull::Row(row) => batch.push(row),
                    Pull::Stop(termination) => {
                        stop = Some(termination);
                        break;
                    }
                }
            }

            let pipeline = &self.pipeline;
            let checks: Vec<_> = batch.par_iter().map(|row| pipeline.check_row(row)).collect();
            debug!(batch = checks.len(), "Checked batch");

            for check in checks {
                let errors = self.pipeline.commit(check);
                if self.record(errors) == Flow::Stop {
                    return Ok(Termination::ErrorLimit);
                }
            }

            if let Some(termination) = stop {
                return Ok(termination);
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn drive_batched(&mut self, _batch_size: usize) -> EngineResult<Termination> {
        self.drive()
    }
}
