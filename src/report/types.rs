//! Validation results and their wire representation

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::issue::{FileIssue, RowIssue};
use crate::schema::CellValue;

/// Overall verdict of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No errors were found
    Pass,
    /// At least one error was found
    Fail,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "pass"),
            Status::Fail => write!(f, "fail"),
        }
    }
}

/// A single validation finding.
///
/// File-level findings carry no row; row-level findings carry the 0-based data
/// row index and the row's identifier value when one could be established.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "WireError")]
pub enum ValidationError {
    /// Defect of the file or run
    File(FileIssue),
    /// Defect of one data row
    Row {
        row_index: usize,
        id: Option<CellValue>,
        issue: RowIssue,
    },
}

impl ValidationError {
    /// Creates a row-level error
    pub fn row(row_index: usize, id: Option<CellValue>, issue: RowIssue) -> Self {
        ValidationError::Row {
            row_index,
            id,
            issue,
        }
    }

    /// 0-based data row index, `None` for file-level errors
    pub fn row_index(&self) -> Option<usize> {
        match self {
            ValidationError::File(_) => None,
            ValidationError::Row { row_index, .. } => Some(*row_index),
        }
    }

    /// Identifier value of the offending row, if known
    pub fn id(&self) -> Option<&CellValue> {
        match self {
            ValidationError::File(_) => None,
            ValidationError::Row { id, .. } => id.as_ref(),
        }
    }

    /// Column the error is about, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            ValidationError::File(issue) => issue.column(),
            ValidationError::Row { issue, .. } => issue.column(),
        }
    }

    /// Stable name of the error kind (e.g. `TypeMismatch`)
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::File(issue) => issue.kind(),
            ValidationError::Row { issue, .. } => issue.kind(),
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            ValidationError::File(issue) => issue.to_string(),
            ValidationError::Row { issue, .. } => issue.to_string(),
        }
    }

    /// Report ordering: row index ascending, then column ascending, with
    /// missing values first in both positions.
    pub fn report_order(&self, other: &Self) -> Ordering {
        self.row_index()
            .cmp(&other.row_index())
            .then_with(|| self.column().cmp(&other.column()))
    }
}

impl From<FileIssue> for ValidationError {
    fn from(issue: FileIssue) -> Self {
        ValidationError::File(issue)
    }
}

/// Outcome of one validation run.
///
/// `status` is `Fail` exactly when `errors` is non-empty, and `errors` is
/// always in report order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    status: Status,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Builds a result from findings in any order
    pub fn from_errors(mut errors: Vec<ValidationError>) -> Self {
        // Stable: findings sharing a (row, column) keep detection order
        errors.sort_by(ValidationError::report_order);
        let status = if errors.is_empty() {
            Status::Pass
        } else {
            Status::Fail
        };
        Self { status, errors }
    }

    /// A passing result
    pub fn pass() -> Self {
        Self::from_errors(Vec::new())
    }

    /// Overall verdict
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the file passed
    pub fn passed(&self) -> bool {
        self.status == Status::Pass
    }

    /// Findings in report order
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the result, returning the findings
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Whether the run stopped before all rows were validated
    pub fn is_partial(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, ValidationError::File(issue) if issue.is_partial_marker()))
    }

    /// Compact wire JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indented wire JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Wire shape of a single error, as consumed by the upload client.
///
/// Nullable fields are always emitted, in this key order. `id` is always an
/// integer since identifier columns are integer columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    pub row_index: Option<usize>,
    pub id: Option<i64>,
    pub column: Option<String>,
    pub error_message: String,
}

impl From<ValidationError> for WireError {
    fn from(error: ValidationError) -> Self {
        Self {
            row_index: error.row_index(),
            id: error.id().and_then(CellValue::as_i64),
            column: error.column().map(str::to_string),
            error_message: error.message(),
        }
    }
}

/// Wire shape of a validation result, for clients decoding the JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireResult {
    pub status: Status,
    pub errors: Vec<WireError>,
}
