//! FILENAME: crosstab-engine/src/view.rs
//! Pivot Result - the matrix handed to the renderer.
//!
//! Plain numbers only: all display formatting (locale, currency, precision)
//! belongs to the renderer.

use serde::{Deserialize, Serialize};

use crate::cache::GroupKey;
use crate::definition::AggregationType;
use crate::error::ConfigIncomplete;

// ============================================================================
// STATS
// ============================================================================

/// Statistics about one calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotStats {
    pub source_rows: usize,
    pub filtered_rows: usize,
    pub populated_cells: usize,
    pub row_keys: usize,
    pub column_keys: usize,
}

// ============================================================================
// RESULT
// ============================================================================

/// The cross-tab: sorted headers, the cell matrix and totals.
///
/// Every value vector holds one entry per value spec, in value spec order.
/// Totals disabled through `PivotOptions` are left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotResult {
    /// Sorted distinct row keys.
    pub row_headers: Vec<GroupKey>,

    /// Sorted distinct column keys.
    pub column_headers: Vec<GroupKey>,

    /// Labels of the row dimensions (outer to inner).
    pub row_dimension_labels: Vec<String>,

    /// Labels of the column dimensions (outer to inner).
    pub column_dimension_labels: Vec<String>,

    /// Labels of the value specs.
    pub value_labels: Vec<String>,

    /// Resolved aggregation per value spec.
    pub aggregations: Vec<AggregationType>,

    /// `matrix[row][col][value]`.
    pub matrix: Vec<Vec<Vec<f64>>>,

    /// `row_totals[row][value]`.
    pub row_totals: Vec<Vec<f64>>,

    /// `column_totals[col][value]`.
    pub column_totals: Vec<Vec<f64>>,

    /// `grand_totals[value]`.
    pub grand_totals: Vec<f64>,

    /// Delimiter used for composite header labels.
    pub label_delimiter: String,

    pub stats: PivotStats,
}

impl PivotResult {
    /// Position of a row key among the headers.
    pub fn row_index(&self, row_key: &GroupKey) -> Option<usize> {
        self.row_headers.binary_search(row_key).ok()
    }

    /// Position of a column key among the headers.
    pub fn column_index(&self, col_key: &GroupKey) -> Option<usize> {
        self.column_headers.binary_search(col_key).ok()
    }

    /// Values at an intersection of known headers.
    pub fn cell(&self, row_key: &GroupKey, col_key: &GroupKey) -> Option<&[f64]> {
        let row = self.row_index(row_key)?;
        let col = self.column_index(col_key)?;
        self.matrix.get(row)?.get(col).map(Vec::as_slice)
    }

    pub fn row_total(&self, row_key: &GroupKey) -> Option<&[f64]> {
        let row = self.row_index(row_key)?;
        self.row_totals.get(row).map(Vec::as_slice)
    }

    pub fn column_total(&self, col_key: &GroupKey) -> Option<&[f64]> {
        let col = self.column_index(col_key)?;
        self.column_totals.get(col).map(Vec::as_slice)
    }

    /// Composite row header labels, e.g. "East / Q1".
    ///
    /// Labels follow `row_headers` order, which sorts keys part by part, not
    /// by the rendered label: `["a", "z"]` comes before `["a b", "x"]`.
    pub fn row_labels(&self) -> Vec<String> {
        self.row_headers
            .iter()
            .map(|key| key.label(&self.label_delimiter))
            .collect()
    }

    /// Composite column header labels.
    pub fn column_labels(&self) -> Vec<String> {
        self.column_headers
            .iter()
            .map(|key| key.label(&self.label_delimiter))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_headers.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_headers.len()
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// What `calculate_pivot` returns when the plan is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
pub enum PivotOutcome {
    /// The matrix is built.
    Ready(PivotResult),
    /// The plan lacks rows, columns or values; callers show a prompt.
    Pending(ConfigIncomplete),
}

impl PivotOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, PivotOutcome::Ready(_))
    }

    pub fn result(&self) -> Option<&PivotResult> {
        match self {
            PivotOutcome::Ready(result) => Some(result),
            PivotOutcome::Pending(_) => None,
        }
    }

    pub fn into_result(self) -> Option<PivotResult> {
        match self {
            PivotOutcome::Ready(result) => Some(result),
            PivotOutcome::Pending(_) => None,
        }
    }
}

// ============================================================================
// DRILL DOWN
// ============================================================================

/// Source rows behind one cell or total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDownResult {
    /// Row key drilled into; `None` means every row (a column total).
    pub row_key: Option<GroupKey>,

    /// Column key drilled into; `None` means every column (a row total).
    pub col_key: Option<GroupKey>,

    /// Source row indices (dataset order), at most `max_records`.
    pub source_rows: Vec<usize>,

    /// Number of matching rows before truncation.
    pub total_count: usize,

    pub max_records: usize,

    pub is_truncated: bool,
}

impl DrillDownResult {
    pub fn new(row_key: Option<GroupKey>, col_key: Option<GroupKey>, max_records: usize) -> Self {
        DrillDownResult {
            row_key,
            col_key,
            source_rows: Vec::new(),
            total_count: 0,
            max_records,
            is_truncated: false,
        }
    }
}
