//! Column sorting with toggle semantics.

use std::cmp::Ordering;

use crate::models::{Field, FieldValue, TableRecord};

/// Sort state with the table's toggle behavior: selecting the active column
/// flips direction, selecting a new column resets to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<Field>,
    pub ascending: bool,
}

impl SortState {
    pub fn toggle(&mut self, column: Field) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }

    /// Sort `records` according to the current state; a no-op until a
    /// column has been chosen.
    pub fn apply(&self, records: &mut [TableRecord]) {
        if let Some(column) = self.column {
            sort_records(records, column, self.ascending);
        }
    }
}

/// Stable sort by one column.
///
/// Metrics (byte sizes included) compare by their numeric value with
/// missing values treated as 0; tag lists compare by their comma-joined
/// name string; everything else by its natural order.
pub fn sort_records(records: &mut [TableRecord], column: Field, ascending: bool) {
    records.sort_by(|a, b| {
        let ord = compare_field(a, b, column);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

fn compare_field(a: &TableRecord, b: &TableRecord, column: Field) -> Ordering {
    match (a.value_of(column), b.value_of(column)) {
        (FieldValue::Int(x), FieldValue::Int(y)) => x.cmp(&y),
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(&y),
        (FieldValue::Time(x), FieldValue::Time(y)) => x.cmp(&y),
        (FieldValue::Num(x), FieldValue::Num(y)) => {
            x.unwrap_or(0.0).total_cmp(&y.unwrap_or(0.0))
        }
        (FieldValue::Tags(x), FieldValue::Tags(y)) => joined(x).cmp(&joined(y)),
        // value_of returns the same variant for the same column
        _ => Ordering::Equal,
    }
}

fn joined(tags: &[crate::models::CategoryKey]) -> String {
    tags.iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
