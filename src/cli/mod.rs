//! CLI module for the csv-validate binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
