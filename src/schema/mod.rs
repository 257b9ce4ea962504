//! Schema definitions
//!
//! A [`Schema`] is the caller-owned document describing the expected columns.
//! A [`SchemaRegistry`] is the compiled, read-only view the pipeline consults:
//! it validates the schema once and answers lookups without I/O.
//!
//! # Example
//!
//! ```rust
//! use csv_validation_engine::schema::{ColumnDefinition, Schema, SchemaRegistry};
//!
//! let schema = Schema::new(vec![
//!     ColumnDefinition::integer("id").unique(),
//!     ColumnDefinition::integer("age").required().with_min(18).with_max(100),
//! ])
//! .with_identifier("id");
//!
//! let registry = SchemaRegistry::new(&schema).unwrap();
//! assert_eq!(registry.columns_in_order().len(), 2);
//! ```

pub mod coerce;
mod error;
mod loader;
mod registry;
mod types;
mod value;

pub use error::{SchemaConfigurationError, SchemaLoadError};
pub use loader::{from_json_str, from_yaml_str, load_schema};
pub use registry::{ColumnRule, CompiledColumn, SchemaRegistry};
pub use types::{Bound, ColumnDefinition, ColumnType, Schema};
pub use value::CellValue;
