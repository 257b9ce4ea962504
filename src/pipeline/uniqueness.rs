//! Cross-row uniqueness state

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDate;

use crate::schema::CellValue;

/// Normalized form of a coerced value used as a uniqueness key.
///
/// Keys compare by value, not by spelling: `01` and `1` collide in an integer
/// column, `TRUE` and `1` in a boolean column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniqueKey {
    Integer(i64),
    /// Bit pattern of the float, with `-0.0` folded into `0.0`
    Float(u64),
    Boolean(bool),
    Date(NaiveDate),
    Text(String),
}

impl From<&CellValue> for UniqueKey {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Integer(v) => UniqueKey::Integer(*v),
            CellValue::Float(v) => {
                let v = if *v == 0.0 { 0.0 } else { *v };
                UniqueKey::Float(v.to_bits())
            }
            CellValue::Boolean(v) => UniqueKey::Boolean(*v),
            CellValue::Date(d) => UniqueKey::Date(*d),
            CellValue::Text(s) => UniqueKey::Text(s.clone()),
        }
    }
}

/// First-seen row per value, per unique column.
///
/// Columns are addressed by their schema-order index. Owned by one pipeline
/// for one run and never cleared mid-run.
#[derive(Debug, Default)]
pub struct UniquenessTracker {
    seen: HashMap<usize, HashMap<UniqueKey, usize>>,
}

impl UniquenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value for a column.
    ///
    /// Returns `None` on first sighting, or the row that first produced the
    /// value when it repeats.
    pub fn observe(&mut self, column: usize, value: &CellValue, row_index: usize) -> Option<usize> {
        let values = self.seen.entry(column).or_default();
        match values.entry(UniqueKey::from(value)) {
            Entry::Occupied(first) => Some(*first.get()),
            Entry::Vacant(slot) => {
                slot.insert(row_index);
                None
            }
        }
    }

    /// Number of distinct values recorded for a column
    pub fn distinct_values(&self, column: usize) -> usize {
        self.seen.get(&column).map_or(0, HashMap::len)
    }

    /// Total number of recorded values across all columns
    pub fn total_values(&self) -> usize {
        self.seen.values().map(HashMap::len).sum()
    }
}
