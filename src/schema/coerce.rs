//! Textual grammars of the column types
//!
//! Coercion never trims: a value with surrounding whitespace is not a number.

use std::fmt::Write;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::ColumnType;
use super::value::CellValue;

static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").unwrap());

static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap()
});

/// Optional `-`, ASCII digits only, within i64
pub fn parse_integer(raw: &str) -> Option<i64> {
    if !INTEGER_PATTERN.is_match(raw) {
        return None;
    }
    raw.parse().ok()
}

/// Plain decimal or exponent notation with `.` as separator; finite only
pub fn parse_float(raw: &str) -> Option<f64> {
    if !FLOAT_PATTERN.is_match(raw) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `true`/`false`/`1`/`0`, case-insensitive
pub fn parse_boolean(raw: &str) -> Option<bool> {
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a date that must round-trip through `format` unchanged
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, format).ok()?;
    match format_date(&date, format) {
        Some(rendered) if rendered == raw => Some(date),
        _ => None,
    }
}

/// Render a date, returning `None` when the format cannot express it
pub fn format_date(date: &NaiveDate, format: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(format)).ok()?;
    Some(rendered)
}

/// Whether the format can both render and read back a full calendar date.
///
/// Formats with time specifiers cannot render a date, and formats missing a
/// component (`%Y` alone) cannot read one back.
pub fn is_valid_date_format(format: &str) -> bool {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let Some(reference) = NaiveDate::from_ymd_opt(2024, 12, 31) else {
        return false;
    };
    format_date(&reference, format)
        .and_then(|rendered| parse_date(&rendered, format))
        .is_some_and(|date| date == reference)
}

/// Coerce a raw field to the declared type.
///
/// `date_format` is only consulted for date columns.
pub fn coerce(raw: &str, column_type: ColumnType, date_format: Option<&str>) -> Option<CellValue> {
    match column_type {
        ColumnType::String => Some(CellValue::Text(raw.to_string())),
        ColumnType::Integer => parse_integer(raw).map(CellValue::Integer),
        ColumnType::Float => parse_float(raw).map(CellValue::Float),
        ColumnType::Boolean => parse_boolean(raw).map(CellValue::Boolean),
        ColumnType::Date => date_format
            .and_then(|format| parse_date(raw, format))
            .map(CellValue::Date),
    }
}
