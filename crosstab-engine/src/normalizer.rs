//! FILENAME: crosstab-engine/src/normalizer.rs
//! Plan Normalizer - validates a plan against a dataset and resolves names.
//!
//! The output carries column positions instead of names so the grouping
//! pass never looks a name up per row.

use rustc_hash::FxHashSet;

use crate::dataset::{ColumnIndex, FlatDataset};
use crate::definition::{
    resolve_aggregation, AggregationType, Dimension, PivotOptions, PivotPlan, ValueSpec,
};
use crate::error::{ConfigIncomplete, PivotConfigError, PlanArea};
use crate::logging::{log_debug, log_enter, log_exit, log_warn, CAT_PIVOT};

/// A row or column dimension resolved to its column position.
#[derive(Debug, Clone)]
pub struct NormalizedDimension {
    pub index: ColumnIndex,
    pub key: String,
    pub label: String,
    /// Grouping texts that exclude a row.
    pub hidden_items: FxHashSet<String>,
}

impl NormalizedDimension {
    pub fn is_hidden(&self, key_text: &str) -> bool {
        !self.hidden_items.is_empty() && self.hidden_items.contains(key_text)
    }
}

/// A value spec resolved to its column position and aggregation.
#[derive(Debug, Clone)]
pub struct NormalizedValue {
    pub index: ColumnIndex,
    pub key: String,
    pub label: String,
    pub aggregation: AggregationType,
}

/// A plan ready for the grouping pass.
#[derive(Debug, Clone)]
pub struct NormalizedPlan {
    pub row_dimensions: Vec<NormalizedDimension>,
    pub column_dimensions: Vec<NormalizedDimension>,
    pub value_specs: Vec<NormalizedValue>,
    pub options: PivotOptions,
}

impl NormalizedPlan {
    pub fn value_count(&self) -> usize {
        self.value_specs.len()
    }

    /// True when any dimension filters items.
    pub fn has_hidden_items(&self) -> bool {
        self.row_dimensions
            .iter()
            .chain(self.column_dimensions.iter())
            .any(|d| !d.hidden_items.is_empty())
    }
}

/// Result of normalization that is not a hard error.
#[derive(Debug, Clone)]
pub enum PlanStatus {
    Ready(NormalizedPlan),
    Incomplete(ConfigIncomplete),
}

/// Validates `plan` against `dataset`.
///
/// Order of checks: missing areas first (a plan still being configured is
/// not an error), then column names, then row widths.
pub fn normalize(dataset: &FlatDataset, plan: &PivotPlan) -> Result<PlanStatus, PivotConfigError> {
    log_enter!(
        CAT_PIVOT,
        "normalize",
        "rows={} cols={} row_dims={} col_dims={} values={}",
        dataset.row_count(),
        dataset.column_count(),
        plan.row_dimensions.len(),
        plan.column_dimensions.len(),
        plan.value_specs.len()
    );

    let mut missing = Vec::new();
    if plan.row_dimensions.is_empty() {
        missing.push(PlanArea::RowDimensions);
    }
    if plan.column_dimensions.is_empty() {
        missing.push(PlanArea::ColumnDimensions);
    }
    if plan.value_specs.is_empty() {
        missing.push(PlanArea::ValueSpecs);
    }
    if !missing.is_empty() {
        log_debug!(CAT_PIVOT, "plan incomplete, missing {:?}", missing);
        return Ok(PlanStatus::Incomplete(ConfigIncomplete { missing }));
    }

    let row_dimensions = resolve_dimensions(dataset, &plan.row_dimensions, PlanArea::RowDimensions)?;
    let column_dimensions =
        resolve_dimensions(dataset, &plan.column_dimensions, PlanArea::ColumnDimensions)?;
    let value_specs = plan
        .value_specs
        .iter()
        .map(|spec| resolve_value(dataset, spec))
        .collect::<Result<Vec<_>, _>>()?;

    check_row_widths(dataset)?;

    log_exit!(CAT_PIVOT, "normalize", "ready");

    Ok(PlanStatus::Ready(NormalizedPlan {
        row_dimensions,
        column_dimensions,
        value_specs,
        options: plan.options.clone(),
    }))
}

fn resolve_column(
    dataset: &FlatDataset,
    key: &str,
    area: PlanArea,
) -> Result<ColumnIndex, PivotConfigError> {
    dataset
        .column_index(key)
        .ok_or_else(|| PivotConfigError::UnknownColumn {
            key: key.to_string(),
            area,
        })
}

fn resolve_dimensions(
    dataset: &FlatDataset,
    dimensions: &[Dimension],
    area: PlanArea,
) -> Result<Vec<NormalizedDimension>, PivotConfigError> {
    dimensions
        .iter()
        .map(|dim| {
            Ok(NormalizedDimension {
                index: resolve_column(dataset, &dim.key, area)?,
                key: dim.key.clone(),
                label: dim.label.clone(),
                hidden_items: dim.hidden_items.iter().cloned().collect(),
            })
        })
        .collect()
}

fn resolve_value(dataset: &FlatDataset, spec: &ValueSpec) -> Result<NormalizedValue, PivotConfigError> {
    let index = resolve_column(dataset, &spec.key, PlanArea::ValueSpecs)?;

    let aggregation = resolve_aggregation(&spec.aggregation);
    if AggregationType::from_name(&spec.aggregation).is_none() {
        log_warn!(
            CAT_PIVOT,
            "unrecognized aggregation '{}' for '{}', using count",
            spec.aggregation,
            spec.key
        );
    }

    Ok(NormalizedValue {
        index,
        key: spec.key.clone(),
        label: spec.label.clone(),
        aggregation,
    })
}

/// Rejects the first row whose width differs from the column count.
fn check_row_widths(dataset: &FlatDataset) -> Result<(), PivotConfigError> {
    let expected = dataset.column_count();
    match dataset.rows.iter().position(|r| r.len() != expected) {
        Some(row) => Err(PivotConfigError::RaggedRow {
            row,
            expected,
            found: dataset.rows[row].len(),
        }),
        None => Ok(()),
    }
}
