//! Validation pipeline
//!
//! Applies the schema's column rules to each tokenized row in five steps:
//!
//! 1. Malformed rows produce their single structural error
//! 2. Presence of required fields
//! 3. Type coercion
//! 4. Range and pattern constraints
//! 5. Uniqueness across rows
//!
//! Steps 1 to 4 are stateless and may run on many rows at once. Step 5 owns
//! the only cross-row state and runs in row order.

mod uniqueness;
mod validator;

pub use uniqueness::{UniqueKey, UniquenessTracker};
pub use validator::{CellOutcome, RowCheck, ValidationPipeline};
