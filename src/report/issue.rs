//! Error kinds reported by a validation run
//!
//! Every finding is one variant of a closed enum carrying exactly the data its
//! message needs. The `Display` output of each variant is the stable
//! `error_message` sent to clients.

use thiserror::Error;

/// A defect of the file or of the run as a whole, not attributable to a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileIssue {
    /// The input contains no header row
    #[error("File is empty: expected a header row.")]
    EmptyFile,

    /// One or more header names occur more than once
    #[error(
        "Header contains duplicate column names: {}; the first occurrence of each is used.",
        .names.join(", ")
    )]
    DuplicateHeaderColumn { names: Vec<String> },

    /// A schema column does not appear in the header
    #[error("Column '{column}' is declared in the schema but missing from the header.")]
    MissingColumn { column: String },

    /// Fewer data rows than the configured minimum
    #[error("File contains {found} data rows; at least {min} are required.")]
    TooFewRows { found: usize, min: usize },

    /// The error cap was hit and the run stopped early
    #[error("Error limit of {max_errors} reached; validation stopped early and results are partial.")]
    ErrorLimitReached { max_errors: usize },

    /// The configured time limit expired and the run stopped early
    #[error("Validation exceeded the time limit of {timeout_ms} ms; results are partial.")]
    ValidationTimedOut { timeout_ms: u64 },

    /// The configured row ceiling was hit and the run stopped early
    #[error("Row limit of {max_rows} reached; remaining rows were not validated.")]
    RowLimitReached { max_rows: usize },
}

impl FileIssue {
    /// Stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            FileIssue::EmptyFile => "EmptyFile",
            FileIssue::DuplicateHeaderColumn { .. } => "DuplicateHeaderColumn",
            FileIssue::MissingColumn { .. } => "MissingColumn",
            FileIssue::TooFewRows { .. } => "TooFewRows",
            FileIssue::ErrorLimitReached { .. } => "ErrorLimitReached",
            FileIssue::ValidationTimedOut { .. } => "ValidationTimedOut",
            FileIssue::RowLimitReached { .. } => "RowLimitReached",
        }
    }

    /// Column the issue is about, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            FileIssue::MissingColumn { column } => Some(column),
            _ => None,
        }
    }

    /// Whether this issue marks a run that stopped before reading all rows
    pub fn is_partial_marker(&self) -> bool {
        matches!(
            self,
            FileIssue::ErrorLimitReached { .. }
                | FileIssue::ValidationTimedOut { .. }
                | FileIssue::RowLimitReached { .. }
        )
    }
}

/// A defect attributable to one data row, and usually one column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowIssue {
    /// Fewer fields than the header
    #[error("Row has {found} fields but the header has {expected}.")]
    TooFewFields { expected: usize, found: usize },

    /// More fields than the header
    #[error("Row has {found} fields but the header has {expected}.")]
    TooManyFields { expected: usize, found: usize },

    /// A quoted field runs to the end of the input
    #[error("Quoted field is not terminated before the end of the input.")]
    UnterminatedQuote,

    /// A field is not valid UTF-8
    #[error("Row contains bytes that are not valid UTF-8.")]
    InvalidEncoding,

    /// A required field is empty
    #[error("Column '{column}' is required but the value is empty.")]
    MissingRequiredField { column: String },

    /// A field cannot be parsed as the declared type
    #[error("Invalid {expected} value: '{value}'.")]
    TypeMismatch {
        column: String,
        expected: String,
        value: String,
    },

    /// A numeric or date value lies outside `min`/`max`
    #[error("Value {value} is outside the allowed range: must be {range}.")]
    RangeViolation {
        column: String,
        value: String,
        range: String,
    },

    /// A string value does not match the column pattern
    #[error("Value '{value}' does not match pattern '{pattern}'.")]
    PatternMismatch {
        column: String,
        value: String,
        pattern: String,
    },

    /// A unique column repeats a value seen in an earlier row
    #[error("Duplicate value '{value}': already used in row {first_row}.")]
    DuplicateValue {
        column: String,
        value: String,
        first_row: usize,
    },
}

impl RowIssue {
    /// Stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            RowIssue::TooFewFields { .. } => "TooFewFields",
            RowIssue::TooManyFields { .. } => "TooManyFields",
            RowIssue::UnterminatedQuote => "UnterminatedQuote",
            RowIssue::InvalidEncoding => "InvalidEncoding",
            RowIssue::MissingRequiredField { .. } => "MissingRequiredField",
            RowIssue::TypeMismatch { .. } => "TypeMismatch",
            RowIssue::RangeViolation { .. } => "RangeViolation",
            RowIssue::PatternMismatch { .. } => "PatternMismatch",
            RowIssue::DuplicateValue { .. } => "DuplicateValue",
        }
    }

    /// Column the issue is about; `None` for structural row defects
    pub fn column(&self) -> Option<&str> {
        match self {
            RowIssue::TooFewFields { .. }
            | RowIssue::TooManyFields { .. }
            | RowIssue::UnterminatedQuote
            | RowIssue::InvalidEncoding => None,
            RowIssue::MissingRequiredField { column }
            | RowIssue::TypeMismatch { column, .. }
            | RowIssue::RangeViolation { column, .. }
            | RowIssue::PatternMismatch { column, .. }
            | RowIssue::DuplicateValue { column, .. } => Some(column),
        }
    }

    /// Whether the row could not be split into aligned fields
    pub fn is_structural(&self) -> bool {
        self.column().is_none()
    }
}
