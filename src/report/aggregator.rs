//! Error accumulation with an error cap

use tracing::debug;

use super::issue::FileIssue;
use super::types::{ValidationError, ValidationResult};

/// Default ceiling on accumulated errors
pub const DEFAULT_MAX_ERRORS: usize = 1000;

/// Whether the producer should keep feeding rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going
    Continue,
    /// The error cap was hit; stop pulling rows
    Stop,
}

/// Collects findings for one run and produces the final result.
///
/// Accepts at most `max_errors` findings. The first finding past the cap is
/// dropped and replaced by a single `ErrorLimitReached` marker; everything after
/// that is dropped silently. Markers added with [`ErrorAggregator::mark`] never
/// count against the cap.
#[derive(Debug)]
pub struct ErrorAggregator {
    max_errors: usize,
    accepted: Vec<ValidationError>,
    markers: Vec<FileIssue>,
    saturated: bool,
    dropped: usize,
}

impl ErrorAggregator {
    /// Create an aggregator with the given cap (values below 1 are raised to 1)
    pub fn new(max_errors: usize) -> Self {
        Self {
            max_errors: max_errors.max(1),
            accepted: Vec::new(),
            markers: Vec::new(),
            saturated: false,
            dropped: 0,
        }
    }

    /// Add one finding
    pub fn push(&mut self, error: ValidationError) -> Flow {
        if self.saturated {
            self.dropped += 1;
            return Flow::Stop;
        }

        if self.accepted.len() >= self.max_errors {
            debug!(max_errors = self.max_errors, "Error limit reached");
            self.saturated = true;
            self.dropped += 1;
            self.markers.push(FileIssue::ErrorLimitReached {
                max_errors: self.max_errors,
            });
            return Flow::Stop;
        }

        self.accepted.push(error);
        Flow::Continue
    }

    /// Add the findings of one row, in detection order
    pub fn extend<I>(&mut self, errors: I) -> Flow
    where
        I: IntoIterator<Item = ValidationError>,
    {
        let mut flow = Flow::Continue;
        for error in errors {
            if self.push(error) == Flow::Stop {
                flow = Flow::Stop;
            }
        }
        flow
    }

    /// Record a run-level marker such as a timeout; exempt from the cap
    pub fn mark(&mut self, issue: FileIssue) {
        if !self.markers.contains(&issue) {
            self.markers.push(issue);
        }
    }

    /// Whether the cap has been exceeded
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// Number of accepted findings, excluding markers
    pub fn error_count(&self) -> usize {
        self.accepted.len()
    }

    /// Number of findings dropped after the cap
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Sort everything into report order and derive the status
    pub fn finish(self) -> ValidationResult {
        let mut errors = self.accepted;
        errors.extend(self.markers.into_iter().map(ValidationError::File));
        ValidationResult::from_errors(errors)
    }
}

impl Default for ErrorAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ERRORS)
    }
}
