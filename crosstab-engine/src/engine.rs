//! FILENAME: crosstab-engine/src/engine.rs
//! Pivot Engine - turns a grouping index into the aggregated matrix.
//!
//! Algorithm:
//! 1. Sort the distinct row and column keys (the only ordering source)
//! 2. Walk the matrix row-major; for each intersection aggregate its raw
//!    lists, and feed the same raw values into the row, column and grand
//!    accumulators
//! 3. Assemble the `PivotResult`
//!
//! Totals are computed from raw values, never from cell aggregates, so an
//! average total is the mean of the underlying values rather than a mean of
//! cell means. Missing intersections aggregate an empty list, which is 0 for
//! every function.

use crate::cache::{group, GroupKey, GroupedIndex};
use crate::dataset::FlatDataset;
use crate::definition::{AggregationType, PivotPlan};
use crate::error::PivotConfigError;
use crate::logging::{log_debug, log_enter, log_exit, log_info, CAT_BUILD, CAT_PIVOT};
use crate::normalizer::{normalize, NormalizedPlan, PlanStatus};
use crate::value::ScalarValue;
use crate::view::{DrillDownResult, PivotOutcome, PivotResult, PivotStats};

// ============================================================================
// AGGREGATE ACCUMULATOR
// ============================================================================

/// Running state for the five aggregations over one list of raw values.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    sum: f64,
    count: u64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    fn add(&mut self, value: &ScalarValue) {
        let n = value.to_number();
        self.count += 1;
        self.sum += n;
        self.min = Some(self.min.map_or(n, |m| m.min(n)));
        self.max = Some(self.max.map_or(n, |m| m.max(n)));
    }

    /// Final value; an empty accumulator is 0 for every aggregation.
    fn compute(&self, aggregation: AggregationType) -> f64 {
        match aggregation {
            AggregationType::Sum => self.sum,
            AggregationType::Count => self.count as f64,
            AggregationType::Average => {
                if self.count > 0 {
                    self.sum / (self.count as f64)
                } else {
                    0.0
                }
            }
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
        }
    }
}

/// Applies one aggregation to a list of raw values.
///
/// `count` counts presence (blanks and text included); the arithmetic
/// functions coerce with `ScalarValue::to_number`. Empty input is 0.
pub fn aggregate<'a, I>(aggregation: AggregationType, values: I) -> f64
where
    I: IntoIterator<Item = &'a ScalarValue>,
{
    let mut acc = Accumulator::default();
    for value in values {
        acc.add(value);
    }
    acc.compute(aggregation)
}

// ============================================================================
// TOTALS BUILDER
// ============================================================================

/// Builds the matrix and totals. Never fails.
pub fn build(grouped: &GroupedIndex, plan: &NormalizedPlan) -> PivotResult {
    let row_headers = grouped.sorted_row_keys();
    let column_headers = grouped.sorted_col_keys();
    let aggregations: Vec<AggregationType> =
        plan.value_specs.iter().map(|spec| spec.aggregation).collect();
    let value_count = aggregations.len();

    log_enter!(
        CAT_BUILD,
        "build",
        "rows={} cols={} values={}",
        row_headers.len(),
        column_headers.len(),
        value_count
    );

    let mut column_accs = vec![vec![Accumulator::default(); value_count]; column_headers.len()];
    let mut grand_accs = vec![Accumulator::default(); value_count];
    let mut row_totals = Vec::with_capacity(row_headers.len());
    let mut matrix = Vec::with_capacity(row_headers.len());

    for row_key in &row_headers {
        let mut row_accs = vec![Accumulator::default(); value_count];
        let mut row_cells = Vec::with_capacity(column_headers.len());

        for (col_idx, col_key) in column_headers.iter().enumerate() {
            let mut cell = Vec::with_capacity(value_count);

            for (vf_idx, &aggregation) in aggregations.iter().enumerate() {
                let mut cell_acc = Accumulator::default();
                for value in grouped.values(row_key, col_key, vf_idx) {
                    cell_acc.add(value);
                    row_accs[vf_idx].add(value);
                    column_accs[col_idx][vf_idx].add(value);
                    grand_accs[vf_idx].add(value);
                }
                cell.push(cell_acc.compute(aggregation));
            }

            row_cells.push(cell);
        }

        matrix.push(row_cells);
        row_totals.push(compute_all(&row_accs, &aggregations));
    }

    let column_totals: Vec<Vec<f64>> = column_accs
        .iter()
        .map(|accs| compute_all(accs, &aggregations))
        .collect();
    let grand_totals = compute_all(&grand_accs, &aggregations);

    let options = &plan.options;
    let stats = PivotStats {
        source_rows: grouped.source_row_count(),
        filtered_rows: grouped.filtered_row_count(),
        populated_cells: grouped.populated_cells(),
        row_keys: row_headers.len(),
        column_keys: column_headers.len(),
    };

    log_exit!(CAT_BUILD, "build", "cells={}", stats.populated_cells);

    PivotResult {
        row_headers,
        column_headers,
        row_dimension_labels: plan.row_dimensions.iter().map(|d| d.label.clone()).collect(),
        column_dimension_labels: plan.column_dimensions.iter().map(|d| d.label.clone()).collect(),
        value_labels: plan.value_specs.iter().map(|v| v.label.clone()).collect(),
        aggregations,
        matrix,
        row_totals: if options.show_row_totals { row_totals } else { Vec::new() },
        column_totals: if options.show_column_totals { column_totals } else { Vec::new() },
        grand_totals: if options.show_grand_totals { grand_totals } else { Vec::new() },
        label_delimiter: options.label_delimiter.clone(),
        stats,
    }
}

fn compute_all(accs: &[Accumulator], aggregations: &[AggregationType]) -> Vec<f64> {
    accs.iter()
        .zip(aggregations.iter())
        .map(|(acc, &aggregation)| acc.compute(aggregation))
        .collect()
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Calculates a cross-tab from a dataset and a plan.
/// This is the main entry point: normalize, group, build.
///
/// An incomplete plan is not an error and yields `PivotOutcome::Pending`.
pub fn calculate_pivot(
    dataset: &FlatDataset,
    plan: &PivotPlan,
) -> Result<PivotOutcome, PivotConfigError> {
    let normalized = match normalize(dataset, plan)? {
        PlanStatus::Ready(normalized) => normalized,
        PlanStatus::Incomplete(incomplete) => {
            log_debug!(CAT_PIVOT, "not ready: {}", incomplete);
            return Ok(PivotOutcome::Pending(incomplete));
        }
    };

    let grouped = group(dataset, &normalized);
    let result = build(&grouped, &normalized);

    log_info!(
        CAT_PIVOT,
        "calculated rows={} cols={} values={} source_rows={}",
        result.row_count(),
        result.column_count(),
        result.value_labels.len(),
        result.stats.source_rows
    );

    Ok(PivotOutcome::Ready(result))
}

/// Returns the source rows behind one cell.
///
/// `None` for a key widens that axis to every header, so
/// `(Some(row), None)` drills into a row total and `(None, None)` into the
/// grand total.
pub fn drill_down(
    grouped: &GroupedIndex,
    row_key: Option<&GroupKey>,
    col_key: Option<&GroupKey>,
    max_records: usize,
) -> DrillDownResult {
    let mut result = DrillDownResult::new(row_key.cloned(), col_key.cloned(), max_records);

    let row_keys = match row_key {
        Some(key) => vec![key.clone()],
        None => grouped.sorted_row_keys(),
    };
    let col_keys = match col_key {
        Some(key) => vec![key.clone()],
        None => grouped.sorted_col_keys(),
    };

    let mut rows: Vec<usize> = Vec::new();
    for r in &row_keys {
        for c in &col_keys {
            if let Some(bucket) = grouped.bucket(r, c) {
                rows.extend_from_slice(&bucket.source_rows);
            }
        }
    }
    rows.sort_unstable();

    result.total_count = rows.len();
    result.is_truncated = rows.len() > max_records;
    rows.truncate(max_records);
    result.source_rows = rows;
    result
}
