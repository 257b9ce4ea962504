//! Schema document types

use serde::{Deserialize, Serialize};

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Any UTF-8 text
    String,
    /// 64-bit signed integer
    Integer,
    /// Finite decimal number
    Float,
    /// true/false/1/0, case-insensitive
    Boolean,
    /// Calendar date in the column's `dateFormat`
    Date,
}

impl ColumnType {
    /// Lowercase type name as used in schema documents and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
        }
    }

    /// Whether `min`/`max` may be declared for this type
    pub fn supports_bounds(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::Float | ColumnType::Date
        )
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `min` or `max` bound as written in the schema document.
///
/// Numbers stay numbers; date bounds are strings in the column's `dateFormat`.
/// The registry checks that a bound suits its column type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Integer(v) => write!(f, "{}", v),
            Bound::Float(v) => write!(f, "{}", v),
            Bound::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for Bound {
    fn from(v: i32) -> Self {
        Bound::Integer(v.into())
    }
}

impl From<i64> for Bound {
    fn from(v: i64) -> Self {
        Bound::Integer(v)
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Float(v)
    }
}

impl From<&str> for Bound {
    fn from(v: &str) -> Self {
        Bound::Text(v.to_string())
    }
}

impl From<String> for Bound {
    fn from(v: String) -> Self {
        Bound::Text(v)
    }
}

/// Definition of one schema column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Column name, matched case-sensitively against the header
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Empty values are reported as missing
    #[serde(default)]
    pub required: bool,

    /// Values must not repeat across rows
    #[serde(default)]
    pub unique: bool,

    /// Regular expression the whole value must match (string columns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,

    /// Inclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,

    /// chrono strftime format, required for date columns (e.g. `%Y-%m-%d`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

impl ColumnDefinition {
    /// Create an optional, non-unique column with no constraints
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            required: false,
            unique: false,
            pattern: None,
            min: None,
            max: None,
            date_format: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    /// Create a date column with its format
    pub fn date(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Date).with_date_format(format)
    }

    /// Mark the column as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the column as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set the pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the inclusive lower bound
    pub fn with_min(mut self, min: impl Into<Bound>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Set the inclusive upper bound
    pub fn with_max(mut self, max: impl Into<Bound>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Set the date format
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

/// An ordered set of column definitions.
///
/// Column order is the canonical report order. The optional identifier column
/// supplies the `id` of reported row errors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub columns: Vec<ColumnDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_column: Option<String>,
}

impl Schema {
    /// Create a schema from columns in report order
    pub fn new(columns: Vec<ColumnDefinition>) -> Self {
        Self {
            columns,
            identifier_column: None,
        }
    }

    /// Designate the identifier column
    pub fn with_identifier(mut self, name: impl Into<String>) -> Self {
        self.identifier_column = Some(name.into());
        self
    }

    /// Look up a column definition by name
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
