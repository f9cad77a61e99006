//! FILENAME: crosstab-engine/src/dataset.rs
//! The flat, already-materialized input: ordered column names plus rows of
//! scalar values positionally aligned with those columns.

use serde::{Deserialize, Serialize};
use crate::value::ScalarValue;

/// Index into the dataset columns (0-based).
pub type ColumnIndex = usize;

/// A rectangular result set as handed over by the query layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatDataset {
    /// Ordered, unique column names.
    pub columns: Vec<String>,

    /// Rows of cells; each row should hold exactly `columns.len()` cells.
    pub rows: Vec<Vec<ScalarValue>>,
}

impl FlatDataset {
    pub fn new(columns: Vec<String>) -> Self {
        FlatDataset {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a dataset from anything convertible into column names and cells.
    pub fn from_rows<C, R, V>(columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<ScalarValue>,
    {
        FlatDataset {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Appends a row. Width is not checked here; see `normalize`.
    pub fn push_row(&mut self, row: Vec<ScalarValue>) {
        self.rows.push(row);
    }

    /// Reserves capacity for expected row count.
    pub fn reserve(&mut self, row_count: usize) {
        self.rows.reserve(row_count);
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<ColumnIndex> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at (row, column); `Missing` when either index is out of range.
    pub fn value_at(&self, row: usize, column: ColumnIndex) -> &ScalarValue {
        match self.rows.get(row) {
            Some(cells) => cell_at(cells, column),
            None => &MISSING,
        }
    }
}

static MISSING: ScalarValue = ScalarValue::Missing;

/// Cell of a single row; `Missing` past the end of a short row.
pub fn cell_at(row: &[ScalarValue], column: ColumnIndex) -> &ScalarValue {
    row.get(column).unwrap_or(&MISSING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_lookup() {
        let dataset = FlatDataset::from_rows(
            ["region", "revenue"],
            vec![
                vec![ScalarValue::from("East"), ScalarValue::from(100)],
                vec![ScalarValue::from("West"), ScalarValue::Null],
            ],
        );

        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_index("revenue"), Some(1));
        assert_eq!(dataset.column_index("Revenue"), None);
        assert_eq!(dataset.value_at(0, 1), &ScalarValue::Number(100.0));
        assert_eq!(dataset.value_at(5, 0), &ScalarValue::Missing);
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{"columns":["region","revenue"],"rows":[["East",100],["West",null]]}"#;
        let dataset: FlatDataset = serde_json::from_str(json).unwrap();

        assert_eq!(dataset.rows[0][0], ScalarValue::text("East"));
        assert_eq!(dataset.rows[1][1], ScalarValue::Null);
    }
}
