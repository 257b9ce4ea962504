//! Engine faults
//!
//! Faults are defects of the caller's configuration or environment. They abort
//! a run and are never turned into row or file findings.

use thiserror::Error;

use crate::schema::SchemaConfigurationError;

/// Errors that abort a validation run
#[derive(Error, Debug)]
pub enum EngineFault {
    /// The schema is internally inconsistent
    #[error("Schema configuration error: {0}")]
    SchemaConfiguration(#[from] SchemaConfigurationError),

    /// The options are inconsistent
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The input stream failed
    #[error("I/O error reading input: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineFault>;
