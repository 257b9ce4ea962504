//! Error types for schema construction and loading

use std::path::PathBuf;

use thiserror::Error;

use super::types::ColumnType;

/// An internally inconsistent schema.
///
/// This is a caller configuration defect, raised before any row is read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaConfigurationError {
    /// No columns declared
    #[error("Schema declares no columns")]
    EmptySchema,

    /// Two columns share a name
    #[error("Duplicate column name in schema: '{0}'")]
    DuplicateColumn(String),

    /// A date column without a format
    #[error("Date column '{0}' has no dateFormat")]
    MissingDateFormat(String),

    /// A non-date column with a format
    #[error("Column '{column}' of type {column_type} cannot have a dateFormat")]
    UnexpectedDateFormat {
        column: String,
        column_type: ColumnType,
    },

    /// A format string that cannot render and read back a full date
    #[error("Invalid dateFormat '{format}' on column '{column}'")]
    InvalidDateFormat { column: String, format: String },

    /// `min` is greater than `max`
    #[error("Column '{column}' has min {min} greater than max {max}")]
    InvertedBounds {
        column: String,
        min: String,
        max: String,
    },

    /// A bound that does not suit the column type
    #[error("Invalid {which} bound '{value}' on column '{column}': expected {expected}")]
    InvalidBound {
        column: String,
        which: &'static str,
        value: String,
        expected: String,
    },

    /// Bounds on a string or boolean column
    #[error("Column '{column}' of type {column_type} does not support min/max bounds")]
    BoundsNotSupported {
        column: String,
        column_type: ColumnType,
    },

    /// A pattern on a non-string column
    #[error("Column '{column}' of type {column_type} does not support a pattern")]
    PatternNotSupported {
        column: String,
        column_type: ColumnType,
    },

    /// A pattern that does not compile
    #[error("Invalid pattern '{pattern}' on column '{column}': {reason}")]
    InvalidPattern {
        column: String,
        pattern: String,
        reason: String,
    },

    /// The identifier column is not declared
    #[error("Identifier column '{0}' is not declared in the schema")]
    UnknownIdentifierColumn(String),

    /// Reported ids are integers, so the identifier column must be one
    #[error("Identifier column '{column}' must be of type integer, found {column_type}")]
    IdentifierNotInteger {
        column: String,
        column_type: ColumnType,
    },
}

/// Errors reading a schema document from disk
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The file could not be read
    #[error("Failed to read schema file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON document
    #[error("Invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML document
    #[error("Invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The extension is not one of json, yaml or yml
    #[error("Unsupported schema file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The document parsed but is inconsistent
    #[error(transparent)]
    Invalid(#[from] SchemaConfigurationError),
}
