//! Validation engine
//!
//! The facade that turns a byte stream and a schema into a
//! [`ValidationResult`](crate::report::ValidationResult).
//!
//! # Flow
//!
//! bytes → tokenizer → rows → pipeline → aggregator → result
//!
//! A run stops pulling rows when the input is exhausted, the error cap is hit,
//! the time budget runs out or the row ceiling is reached. Every early stop is
//! labelled in the result with a file-level marker.
//!
//! Only [`EngineFault`]s abort a run: an inconsistent schema, invalid options
//! or a failing input stream.
//!
//! # Example
//!
//! ```rust
//! use csv_validation_engine::engine::{Engine, ValidationOptions};
//! use csv_validation_engine::schema::{ColumnDefinition, Schema};
//!
//! let schema = Schema::new(vec![
//!     ColumnDefinition::integer("id").unique(),
//!     ColumnDefinition::integer("age").required(),
//! ])
//! .with_identifier("id");
//!
//! let engine = Engine::with_options(ValidationOptions::builder().max_errors(100).build());
//! let result = engine.validate("id,age\n1,30\n1,40\n".as_bytes(), &schema).unwrap();
//!
//! assert!(!result.passed());
//! assert_eq!(result.errors()[0].kind(), "DuplicateValue");
//! ```

mod config;
mod error;
mod executor;

pub use config::{ValidationOptions, ValidationOptionsBuilder};
pub use error::{EngineFault, EngineResult};
pub use executor::{Engine, RunStats, Termination, ValidationReport, validate};
