//! Coerced cell values

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// A field value after successful coercion to its declared column type.
///
/// Serializes as a bare JSON scalar: numbers for integer and float values,
/// a boolean for boolean values and a string for text and dates.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 64-bit signed integer
    Integer(i64),
    /// Finite 64-bit float
    Float(f64),
    /// Boolean
    Boolean(bool),
    /// Calendar date
    Date(NaiveDate),
    /// UTF-8 text
    Text(String),
}

impl CellValue {
    /// Returns the integer value, if this is an integer cell
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value, if this is a text cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Boolean(v) => write!(f, "{}", v),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Integer(v) => serializer.serialize_i64(*v),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Boolean(v) => serializer.serialize_bool(*v),
            CellValue::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}
