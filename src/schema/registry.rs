//! Compiled, read-only view of a schema

use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use super::coerce::{self, format_date, is_valid_date_format, parse_date, parse_float, parse_integer};
use super::error::SchemaConfigurationError;
use super::types::{Bound, ColumnDefinition, ColumnType, Schema};
use super::value::CellValue;

/// Type-specific rule of a column with its constraints compiled
#[derive(Debug, Clone)]
pub enum ColumnRule {
    Text {
        pattern: Option<Regex>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Float {
        min: Option<f64>,
        max: Option<f64>,
    },
    Boolean,
    Date {
        format: String,
        min: Option<NaiveDate>,
        max: Option<NaiveDate>,
    },
}

/// A column definition together with its compiled rule
#[derive(Debug, Clone)]
pub struct CompiledColumn<'s> {
    definition: &'s ColumnDefinition,
    rule: ColumnRule,
    range: Option<String>,
}

impl<'s> CompiledColumn<'s> {
    pub fn name(&self) -> &'s str {
        &self.definition.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.definition.column_type
    }

    pub fn is_required(&self) -> bool {
        self.definition.required
    }

    pub fn is_unique(&self) -> bool {
        self.definition.unique
    }

    /// Pattern source as written in the schema
    pub fn pattern(&self) -> Option<&'s str> {
        self.definition.pattern.as_deref()
    }

    pub fn definition(&self) -> &'s ColumnDefinition {
        self.definition
    }

    pub fn rule(&self) -> &ColumnRule {
        &self.rule
    }

    /// Human-readable allowed range, e.g. `between 18 and 100`
    pub fn range_text(&self) -> Option<&str> {
        self.range.as_deref()
    }

    /// Coerce a raw field to this column's type
    pub fn coerce(&self, raw: &str) -> Option<CellValue> {
        coerce::coerce(
            raw,
            self.definition.column_type,
            self.definition.date_format.as_deref(),
        )
    }

    /// Whether a coerced value lies within `min`/`max`, inclusive
    pub fn in_range(&self, value: &CellValue) -> bool {
        match (&self.rule, value) {
            (ColumnRule::Integer { min, max }, CellValue::Integer(v)) => within(v, min, max),
            (ColumnRule::Float { min, max }, CellValue::Float(v)) => within(v, min, max),
            (ColumnRule::Date { min, max, .. }, CellValue::Date(v)) => within(v, min, max),
            _ => true,
        }
    }

    /// Whether a string value matches the pattern; true when there is none
    pub fn matches_pattern(&self, value: &str) -> bool {
        match &self.rule {
            ColumnRule::Text {
                pattern: Some(regex),
            } => regex.is_match(value),
            _ => true,
        }
    }
}

fn within<T: PartialOrd>(value: &T, min: &Option<T>, max: &Option<T>) -> bool {
    min.as_ref().is_none_or(|m| value >= m) && max.as_ref().is_none_or(|m| value <= m)
}

/// Ordered, validated column definitions of one schema.
///
/// Construction checks the schema for internal consistency and compiles
/// patterns, bounds and date formats once. Lookups never allocate.
#[derive(Debug, Clone)]
pub struct SchemaRegistry<'s> {
    schema: &'s Schema,
    columns: Vec<CompiledColumn<'s>>,
    by_name: HashMap<&'s str, usize>,
    identifier: Option<usize>,
}

impl<'s> SchemaRegistry<'s> {
    /// Validate and compile a schema
    pub fn new(schema: &'s Schema) -> Result<Self, SchemaConfigurationError> {
        if schema.columns.is_empty() {
            return Err(SchemaConfigurationError::EmptySchema);
        }

        let mut columns = Vec::with_capacity(schema.columns.len());
        let mut by_name = HashMap::with_capacity(schema.columns.len());

        for (idx, definition) in schema.columns.iter().enumerate() {
            if by_name.insert(definition.name.as_str(), idx).is_some() {
                return Err(SchemaConfigurationError::DuplicateColumn(
                    definition.name.clone(),
                ));
            }
            columns.push(compile_column(definition)?);
        }

        let identifier = match &schema.identifier_column {
            Some(name) => {
                let idx = *by_name
                    .get(name.as_str())
                    .ok_or_else(|| SchemaConfigurationError::UnknownIdentifierColumn(name.clone()))?;
                let column_type = columns[idx].column_type();
                if column_type != ColumnType::Integer {
                    return Err(SchemaConfigurationError::IdentifierNotInteger {
                        column: name.clone(),
                        column_type,
                    });
                }
                Some(idx)
            }
            None => None,
        };

        debug!(
            columns = columns.len(),
            identifier = ?schema.identifier_column,
            "Compiled schema"
        );

        Ok(Self {
            schema,
            columns,
            by_name,
            identifier,
        })
    }

    /// Look up a column by name
    pub fn resolve(&self, name: &str) -> Option<&CompiledColumn<'s>> {
        self.by_name.get(name).map(|&idx| &self.columns[idx])
    }

    /// Columns in schema order
    pub fn columns_in_order(&self) -> &[CompiledColumn<'s>] {
        &self.columns
    }

    /// The identifier column, if one is designated
    pub fn identifier_column(&self) -> Option<&CompiledColumn<'s>> {
        self.identifier.map(|idx| &self.columns[idx])
    }

    /// Schema-order index of the identifier column
    pub fn identifier_index(&self) -> Option<usize> {
        self.identifier
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn compile_column(definition: &ColumnDefinition) -> Result<CompiledColumn<'_>, SchemaConfigurationError> {
    let name = &definition.name;
    let column_type = definition.column_type;

    match (&definition.date_format, column_type) {
        (None, ColumnType::Date) => {
            return Err(SchemaConfigurationError::MissingDateFormat(name.clone()));
        }
        (Some(format), ColumnType::Date) if !is_valid_date_format(format) => {
            return Err(SchemaConfigurationError::InvalidDateFormat {
                column: name.clone(),
                format: format.clone(),
            });
        }
        (Some(_), ty) if ty != ColumnType::Date => {
            return Err(SchemaConfigurationError::UnexpectedDateFormat {
                column: name.clone(),
                column_type,
            });
        }
        _ => {}
    }

    if definition.pattern.is_some() && column_type != ColumnType::String {
        return Err(SchemaConfigurationError::PatternNotSupported {
            column: name.clone(),
            column_type,
        });
    }

    let has_bounds = definition.min.is_some() || definition.max.is_some();
    if has_bounds && !column_type.supports_bounds() {
        return Err(SchemaConfigurationError::BoundsNotSupported {
            column: name.clone(),
            column_type,
        });
    }

    let (rule, range) = match column_type {
        ColumnType::String => {
            let pattern = definition
                .pattern
                .as_deref()
                .map(|source| compile_pattern(name, source))
                .transpose()?;
            (ColumnRule::Text { pattern }, None)
        }
        ColumnType::Boolean => (ColumnRule::Boolean, None),
        ColumnType::Integer => {
            let min = integer_bound(definition, "min", definition.min.as_ref())?;
            let max = integer_bound(definition, "max", definition.max.as_ref())?;
            check_order(name, &min, &max)?;
            let range = range_text(min.map(|v| v.to_string()), max.map(|v| v.to_string()));
            (ColumnRule::Integer { min, max }, range)
        }
        ColumnType::Float => {
            let min = float_bound(definition, "min", definition.min.as_ref())?;
            let max = float_bound(definition, "max", definition.max.as_ref())?;
            check_order(name, &min, &max)?;
            let range = range_text(min.map(|v| v.to_string()), max.map(|v| v.to_string()));
            (ColumnRule::Float { min, max }, range)
        }
        ColumnType::Date => {
            let format = definition.date_format.clone().unwrap_or_default();
            let min = date_bound(definition, &format, "min", definition.min.as_ref())?;
            let max = date_bound(definition, &format, "max", definition.max.as_ref())?;
            check_order(name, &min, &max)?;
            let range = range_text(
                min.and_then(|d| format_date(&d, &format)),
                max.and_then(|d| format_date(&d, &format)),
            );
            (ColumnRule::Date { format, min, max }, range)
        }
    };

    Ok(CompiledColumn {
        definition,
        rule,
        range,
    })
}

fn compile_pattern(column: &str, source: &str) -> Result<Regex, SchemaConfigurationError> {
    Regex::new(&format!("^(?:{})$", source)).map_err(|e| SchemaConfigurationError::InvalidPattern {
        column: column.to_string(),
        pattern: source.to_string(),
        reason: e.to_string(),
    })
}

fn invalid_bound(
    definition: &ColumnDefinition,
    which: &'static str,
    bound: &Bound,
    expected: impl Into<String>,
) -> SchemaConfigurationError {
    SchemaConfigurationError::InvalidBound {
        column: definition.name.clone(),
        which,
        value: bound.to_string(),
        expected: expected.into(),
    }
}

fn integer_bound(
    definition: &ColumnDefinition,
    which: &'static str,
    bound: Option<&Bound>,
) -> Result<Option<i64>, SchemaConfigurationError> {
    let Some(bound) = bound else {
        return Ok(None);
    };
    let value = match bound {
        Bound::Integer(v) => Some(*v),
        Bound::Float(_) => None,
        Bound::Text(s) => parse_integer(s),
    };
    value
        .map(Some)
        .ok_or_else(|| invalid_bound(definition, which, bound, "an integer"))
}

fn float_bound(
    definition: &ColumnDefinition,
    which: &'static str,
    bound: Option<&Bound>,
) -> Result<Option<f64>, SchemaConfigurationError> {
    let Some(bound) = bound else {
        return Ok(None);
    };
    let value = match bound {
        Bound::Integer(v) => Some(*v as f64),
        Bound::Float(v) => Some(*v).filter(|v| v.is_finite()),
        Bound::Text(s) => parse_float(s),
    };
    value
        .map(Some)
        .ok_or_else(|| invalid_bound(definition, which, bound, "a finite number"))
}

fn date_bound(
    definition: &ColumnDefinition,
    format: &str,
    which: &'static str,
    bound: Option<&Bound>,
) -> Result<Option<NaiveDate>, SchemaConfigurationError> {
    let Some(bound) = bound else {
        return Ok(None);
    };
    let value = match bound {
        Bound::Text(s) => parse_date(s, format),
        Bound::Integer(_) | Bound::Float(_) => None,
    };
    value
        .map(Some)
        .ok_or_else(|| invalid_bound(definition, which, bound, format!("a date in format {}", format)))
}

fn check_order<T: PartialOrd + ToString>(
    column: &str,
    min: &Option<T>,
    max: &Option<T>,
) -> Result<(), SchemaConfigurationError> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(SchemaConfigurationError::InvertedBounds {
                column: column.to_string(),
                min: lo.to_string(),
                max: hi.to_string(),
            });
        }
    }
    Ok(())
}

fn range_text(min: Option<String>, max: Option<String>) -> Option<String> {
    match (min, max) {
        (Some(lo), Some(hi)) => Some(format!("between {} and {}", lo, hi)),
        (Some(lo), None) => Some(format!("at least {}", lo)),
        (None, Some(hi)) => Some(format!("at most {}", hi)),
        (None, None) => None,
    }
}
