//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineFault;
use crate::schema::SchemaLoadError;

/// Errors reported by the csv-validate binary
#[derive(Error, Debug)]
pub enum CliError {
    /// A command-line value could not be used
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input file could not be opened
    #[error("Failed to read {}: {1}", .0.display())]
    FileReadError(PathBuf, String),

    /// The schema file could not be loaded
    #[error(transparent)]
    SchemaLoad(#[from] SchemaLoadError),

    /// The engine aborted the run
    #[error(transparent)]
    Engine(#[from] EngineFault),

    /// The result could not be written
    #[error("Failed to write output: {0}")]
    Output(String),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
