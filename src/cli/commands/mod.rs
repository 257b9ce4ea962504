//! CLI command implementations

pub mod validate;

pub use validate::{ValidateArgs, handle_validate, run_validate};
