//! Per-row validation against a compiled schema

use tracing::{debug, warn};

use super::uniqueness::UniquenessTracker;
use crate::report::{FileIssue, RowIssue, ValidationError};
use crate::schema::{CellValue, ColumnRule, CompiledColumn, SchemaRegistry};
use crate::schema::coerce::format_date;
use crate::tokenizer::{Header, TokenizedRow};

/// Outcome of the stateless checks on one field
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    /// Presence, type, range and pattern checks passed
    Valid(CellValue),
    /// Optional field left empty; nothing further to check
    Empty,
    /// The column is missing from the header
    Unbound,
    /// The first failing check
    Invalid(RowIssue),
}

#[derive(Debug, Clone, PartialEq)]
enum CheckedCells {
    Malformed(RowIssue),
    Cells(Vec<CellOutcome>),
}

/// Result of the stateless stage for one row, ready to be committed.
///
/// Holds one outcome per schema column in schema order, or the structural
/// defect of a malformed row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCheck {
    row_index: usize,
    id: Option<CellValue>,
    checked: CheckedCells,
}

impl RowCheck {
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// Identifier value established for this row
    pub fn id(&self) -> Option<&CellValue> {
        self.id.as_ref()
    }

    /// Per-column outcomes, `None` for a malformed row
    pub fn cells(&self) -> Option<&[CellOutcome]> {
        match &self.checked {
            CheckedCells::Cells(cells) => Some(cells),
            CheckedCells::Malformed(_) => None,
        }
    }
}

/// Applies column rules to rows and tracks uniqueness across rows.
///
/// Work is split in two stages. [`ValidationPipeline::check_row`] runs the
/// presence, type, range and pattern checks and needs only shared access, so
/// rows can be checked concurrently. [`ValidationPipeline::commit`] applies
/// the uniqueness checks and must see rows in order.
pub struct ValidationPipeline<'s> {
    registry: SchemaRegistry<'s>,
    positions: Vec<Option<usize>>,
    tracker: UniquenessTracker,
    rows_committed: usize,
}

impl<'s> ValidationPipeline<'s> {
    /// Bind the schema columns to header positions
    pub fn new(registry: SchemaRegistry<'s>, header: &Header) -> Self {
        let positions: Vec<Option<usize>> = registry
            .columns_in_order()
            .iter()
            .map(|column| header.position(column.name()))
            .collect();

        let bound = positions.iter().filter(|p| p.is_some()).count();
        debug!(
            schema_columns = registry.len(),
            header_columns = header.len(),
            bound,
            "Bound schema to header"
        );

        Self {
            registry,
            positions,
            tracker: UniquenessTracker::new(),
            rows_committed: 0,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry<'s> {
        &self.registry
    }

    /// Schema columns that do not appear in the header, in schema order
    pub fn unbound_columns(&self) -> Vec<&'s str> {
        self.registry
            .columns_in_order()
            .iter()
            .zip(&self.positions)
            .filter(|(_, position)| position.is_none())
            .map(|(column, _)| column.name())
            .collect()
    }

    /// File-level findings for columns missing from the header
    pub fn binding_issues(&self) -> Vec<FileIssue> {
        let missing = self.unbound_columns();
        if !missing.is_empty() {
            warn!(columns = ?missing, "Schema columns missing from header");
        }
        missing
            .into_iter()
            .map(|column| FileIssue::MissingColumn {
                column: column.to_string(),
            })
            .collect()
    }

    /// Rows passed through [`ValidationPipeline::commit`] so far
    pub fn rows_committed(&self) -> usize {
        self.rows_committed
    }

    /// Values currently held by the uniqueness tracker
    pub fn tracked_values(&self) -> usize {
        self.tracker.total_values()
    }

    /// Stateless stage: structural, presence, type, range and pattern checks
    pub fn check_row(&self, row: &TokenizedRow) -> RowCheck {
        let raw = match row {
            TokenizedRow::Malformed { row_index, issue } => {
                return RowCheck {
                    row_index: *row_index,
                    id: None,
                    checked: CheckedCells::Malformed(issue.clone()),
                };
            }
            TokenizedRow::Fields(raw) => raw,
        };

        let cells: Vec<CellOutcome> = self
            .registry
            .columns_in_order()
            .iter()
            .zip(&self.positions)
            .map(|(column, position)| match position {
                Some(position) => check_field(column, raw.field(*position).unwrap_or("")),
                None => CellOutcome::Unbound,
            })
            .collect();

        let id = self
            .registry
            .identifier_index()
            .and_then(|idx| match &cells[idx] {
                CellOutcome::Valid(value) => Some(value.clone()),
                _ => None,
            });

        RowCheck {
            row_index: raw.row_index,
            id,
            checked: CheckedCells::Cells(cells),
        }
    }

    /// Stateful stage: uniqueness checks, then findings in detection order
    pub fn commit(&mut self, check: RowCheck) -> Vec<ValidationError> {
        self.rows_committed += 1;
        let RowCheck {
            row_index,
            id,
            checked,
        } = check;

        let cells = match checked {
            CheckedCells::Malformed(issue) => {
                return vec![ValidationError::row(row_index, None, issue)];
            }
            CheckedCells::Cells(cells) => cells,
        };

        let mut errors = Vec::new();
        for (idx, (column, cell)) in self
            .registry
            .columns_in_order()
            .iter()
            .zip(cells)
            .enumerate()
        {
            match cell {
                CellOutcome::Invalid(issue) => {
                    errors.push(ValidationError::row(row_index, id.clone(), issue));
                }
                CellOutcome::Valid(value) if column.is_unique() => {
                    if let Some(first_row) = self.tracker.observe(idx, &value, row_index) {
                        let issue = RowIssue::DuplicateValue {
                            column: column.name().to_string(),
                            value: display_value(column, &value),
                            first_row,
                        };
                        errors.push(ValidationError::row(row_index, id.clone(), issue));
                    }
                }
                _ => {}
            }
        }
        errors
    }

    /// Run both stages on one row
    pub fn process(&mut self, row: &TokenizedRow) -> Vec<ValidationError> {
        let check = self.check_row(row);
        self.commit(check)
    }
}

/// Steps 2 to 4 for a single field; the first failing check wins
fn check_field(column: &CompiledColumn<'_>, raw: &str) -> CellOutcome {
    let name = column.name();

    if raw.trim().is_empty() {
        return if column.is_required() {
            CellOutcome::Invalid(RowIssue::MissingRequiredField {
                column: name.to_string(),
            })
        } else {
            CellOutcome::Empty
        };
    }

    let Some(value) = column.coerce(raw) else {
        return CellOutcome::Invalid(RowIssue::TypeMismatch {
            column: name.to_string(),
            expected: column.column_type().to_string(),
            value: raw.to_string(),
        });
    };

    if !column.in_range(&value) {
        return CellOutcome::Invalid(RowIssue::RangeViolation {
            column: name.to_string(),
            value: raw.to_string(),
            range: column.range_text().unwrap_or_default().to_string(),
        });
    }

    if let CellValue::Text(text) = &value {
        if !column.matches_pattern(text) {
            return CellOutcome::Invalid(RowIssue::PatternMismatch {
                column: name.to_string(),
                value: raw.to_string(),
                pattern: column.pattern().unwrap_or_default().to_string(),
            });
        }
    }

    CellOutcome::Valid(value)
}

/// Render a value the way it is written in the column's own notation
fn display_value(column: &CompiledColumn<'_>, value: &CellValue) -> String {
    match (column.rule(), value) {
        (ColumnRule::Date { format, .. }, CellValue::Date(date)) => {
            format_date(date, format).unwrap_or_else(|| value.to_string())
        }
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, Schema};
    use crate::tokenizer::RawRow;

    fn row(row_index: usize, fields: &[&str]) -> TokenizedRow {
        TokenizedRow::Fields(RawRow {
            row_index,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDefinition::integer("id").unique(),
            ColumnDefinition::string("email").required(),
            ColumnDefinition::integer("age").with_min(18).with_max(100),
        ])
        .with_identifier("id")
    }

    #[test]
    fn test_clean_row_has_no_errors() {
        let schema = schema();
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["id", "email", "age"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        assert!(pipeline.process(&row(0, &["1", "a@b.c", "30"])).is_empty());
        assert_eq!(pipeline.rows_committed(), 1);
        assert_eq!(pipeline.tracked_values(), 1);
    }

    #[test]
    fn test_errors_follow_schema_order_and_carry_id() {
        let schema = schema();
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["age", "email", "id"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        let errors = pipeline.process(&row(4, &["abc", " ", "7"]));
        let kinds: Vec<&str> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["MissingRequiredField", "TypeMismatch"]);
        assert!(errors.iter().all(|e| e.id() == Some(&CellValue::Integer(7))));
        assert!(errors.iter().all(|e| e.row_index() == Some(4)));
    }

    #[test]
    fn test_invalid_identifier_leaves_id_empty() {
        let schema = schema();
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["id", "email", "age"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        let errors = pipeline.process(&row(0, &["x1", "a@b.c", "5"]));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.id().is_none()));
    }

    #[test]
    fn test_range_message() {
        let schema = schema();
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["id", "email", "age"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        let errors = pipeline.process(&row(0, &["1", "a@b.c", "101"]));
        assert_eq!(
            errors[0].message(),
            "Value 101 is outside the allowed range: must be between 18 and 100."
        );
    }

    #[test]
    fn test_duplicate_keeps_identifier() {
        let schema = schema();
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["id", "email", "age"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        assert!(pipeline.process(&row(0, &["1", "a@b.c", "30"])).is_empty());
        let errors = pipeline.process(&row(1, &["01", "d@e.f", "40"]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), "DuplicateValue");
        assert_eq!(errors[0].column(), Some("id"));
        assert_eq!(errors[0].id(), Some(&CellValue::Integer(1)));
        assert_eq!(
            errors[0].message(),
            "Duplicate value '1': already used in row 0."
        );
    }

    #[test]
    fn test_failed_values_are_not_tracked() {
        let schema = Schema::new(vec![
            ColumnDefinition::integer("n").unique().with_max(10),
        ]);
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["n"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        assert_eq!(pipeline.process(&row(0, &["50"])).len(), 1);
        assert!(pipeline.process(&row(1, &["50"]))[0].kind() == "RangeViolation");
        assert_eq!(pipeline.tracked_values(), 0);
    }

    #[test]
    fn test_empty_optional_skips_checks() {
        let schema = Schema::new(vec![
            ColumnDefinition::integer("n").unique(),
            ColumnDefinition::string("s"),
        ]);
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["n", "s"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        assert!(pipeline.process(&row(0, &["", ""])).is_empty());
        assert!(pipeline.process(&row(1, &["", ""])).is_empty());
    }

    #[test]
    fn test_malformed_row_yields_single_error() {
        let schema = schema();
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["id", "email", "age"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        let malformed = TokenizedRow::Malformed {
            row_index: 3,
            issue: RowIssue::TooFewFields {
                expected: 3,
                found: 1,
            },
        };
        let errors = pipeline.process(&malformed);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].column(), None);
        assert_eq!(errors[0].id(), None);
    }

    #[test]
    fn test_unbound_columns_are_reported_and_skipped() {
        let schema = schema();
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["id", "extra"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        assert_eq!(pipeline.unbound_columns(), vec!["email", "age"]);
        assert_eq!(
            pipeline.binding_issues(),
            vec![
                FileIssue::MissingColumn {
                    column: "email".into()
                },
                FileIssue::MissingColumn {
                    column: "age".into()
                },
            ]
        );
        assert!(pipeline.process(&row(0, &["1", "whatever"])).is_empty());
    }

    #[test]
    fn test_pattern_and_date_checks() {
        let schema = Schema::new(vec![
            ColumnDefinition::string("code").with_pattern("[A-Z]{3}"),
            ColumnDefinition::date("day", "%d/%m/%Y")
                .unique()
                .with_max("31/12/2024"),
        ]);
        let registry = SchemaRegistry::new(&schema).unwrap();
        let header = Header::new(["code", "day"]);
        let mut pipeline = ValidationPipeline::new(registry, &header);

        let errors = pipeline.process(&row(0, &["abc", "01/01/2025"]));
        let kinds: Vec<&str> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["PatternMismatch", "RangeViolation"]);

        assert!(pipeline.process(&row(1, &["ABC", "05/06/2024"])).is_empty());
        let errors = pipeline.process(&row(2, &["XYZ", "05/06/2024"]));
        assert_eq!(
            errors[0].message(),
            "Duplicate value '05/06/2024': already used in row 1."
        );
    }
}
