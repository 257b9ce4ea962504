//! CSV Validation Engine - Streaming, schema-driven validation of CSV uploads
//!
//! Provides:
//! - A quoting-aware tokenizer that reports malformed rows without aborting
//! - Schemas with typed columns, presence, range, pattern and uniqueness rules
//! - A single-pass pipeline with bounded memory and optional parallel checks
//! - Deterministic results in the `{status, errors}` wire shape
//!
//! # Example
//!
//! ```rust
//! use csv_validation_engine::{ColumnDefinition, Schema, ValidationOptions, validate};
//!
//! let schema = Schema::new(vec![
//!     ColumnDefinition::integer("id").unique(),
//!     ColumnDefinition::string("email").required(),
//! ])
//! .with_identifier("id");
//!
//! let csv = "id,email\n1,a@example.com\n2,\n";
//! let result = validate(csv.as_bytes(), &schema, &ValidationOptions::default()).unwrap();
//!
//! assert!(!result.passed());
//! assert_eq!(
//!     result.to_json().unwrap(),
//!     r#"{"status":"fail","errors":[{"row_index":1,"id":2,"column":"email","error_message":"Column 'email' is required but the value is empty."}]}"#
//! );
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod engine;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod tokenizer;

// Re-export commonly used types
pub use engine::{
    Engine, EngineFault, EngineResult, RunStats, Termination, ValidationOptions,
    ValidationReport, validate,
};
pub use report::{FileIssue, RowIssue, Status, ValidationError, ValidationResult};
pub use schema::{
    Bound, CellValue, ColumnDefinition, ColumnType, Schema, SchemaConfigurationError,
    SchemaLoadError, SchemaRegistry, load_schema,
};
pub use tokenizer::Dialect;
