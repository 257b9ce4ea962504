//! Options for a validation run

use serde::{Deserialize, Serialize};

use super::error::EngineFault;
use crate::report::DEFAULT_MAX_ERRORS;
use crate::tokenizer::Dialect;

/// Options for a validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    /// Field delimiter, a single ASCII character
    pub delimiter: char,

    /// Quote character, a single ASCII character
    pub quote_char: char,

    /// Maximum number of errors collected before the run stops
    pub max_errors: usize,

    /// Wall-clock budget for the run in milliseconds
    pub timeout_ms: Option<u64>,

    /// Maximum number of data rows to validate
    pub max_rows: Option<usize>,

    /// Minimum number of data rows the file must contain
    pub min_rows: Option<usize>,

    /// Rows checked per parallel batch (`parallel` feature; 0 or 1 = sequential)
    pub parallel_batch_size: Option<usize>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: '"',
            max_errors: DEFAULT_MAX_ERRORS,
            timeout_ms: None,
            max_rows: None,
            min_rows: None,
            parallel_batch_size: None,
        }
    }
}

impl ValidationOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom options
    pub fn builder() -> ValidationOptionsBuilder {
        ValidationOptionsBuilder::default()
    }

    /// Check the options for consistency
    pub fn validate(&self) -> Result<(), EngineFault> {
        let delimiter = dialect_byte("delimiter", self.delimiter)?;
        let quote = dialect_byte("quote character", self.quote_char)?;
        if delimiter == quote {
            return Err(EngineFault::InvalidOptions(format!(
                "delimiter and quote character must differ, both are {:?}",
                self.delimiter
            )));
        }
        if self.max_errors == 0 {
            return Err(EngineFault::InvalidOptions(
                "maxErrors must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Tokenizer dialect for these options
    pub fn dialect(&self) -> Result<Dialect, EngineFault> {
        self.validate()?;
        Ok(Dialect::new(self.delimiter as u8, self.quote_char as u8))
    }
}

fn dialect_byte(what: &str, c: char) -> Result<u8, EngineFault> {
    if !c.is_ascii() || c == '\n' || c == '\r' {
        return Err(EngineFault::InvalidOptions(format!(
            "{} must be a single ASCII character other than a line break, got {:?}",
            what, c
        )));
    }
    Ok(c as u8)
}

/// Builder for ValidationOptions
#[derive(Debug, Default)]
pub struct ValidationOptionsBuilder {
    options: ValidationOptions,
}

impl ValidationOptionsBuilder {
    /// Set the field delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn quote_char(mut self, quote: char) -> Self {
        self.options.quote_char = quote;
        self
    }

    /// Set the error cap
    pub fn max_errors(mut self, max: usize) -> Self {
        self.options.max_errors = max;
        self
    }

    /// Set the time budget in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.options.timeout_ms = Some(timeout_ms);
        self
    }

    /// Set the row ceiling
    pub fn max_rows(mut self, max: usize) -> Self {
        self.options.max_rows = Some(max);
        self
    }

    /// Set the minimum number of data rows
    pub fn min_rows(mut self, min: usize) -> Self {
        self.options.min_rows = Some(min);
        self
    }

    /// Set the parallel batch size
    pub fn parallel_batch_size(mut self, size: usize) -> Self {
        self.options.parallel_batch_size = Some(size);
        self
    }

    /// Build the options
    pub fn build(self) -> ValidationOptions {
        self.options
    }
}
