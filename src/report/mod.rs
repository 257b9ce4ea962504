//! Validation findings, aggregation and the result contract
//!
//! Findings are modelled as closed enums ([`FileIssue`], [`RowIssue`]) and only
//! flattened into the nullable `{row_index, id, column, error_message}` shape
//! when a [`ValidationResult`] is serialized.

mod aggregator;
mod issue;
mod types;

pub use aggregator::{DEFAULT_MAX_ERRORS, ErrorAggregator, Flow};
pub use issue::{FileIssue, RowIssue};
pub use types::{Status, ValidationError, ValidationResult, WireError, WireResult};
