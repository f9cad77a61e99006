//! FILENAME: crosstab-engine/src/cache.rs
//! Grouping Index - raw values bucketed by (row key, column key).
//!
//! The index is designed for:
//! - A single O(n) pass over the source rows
//! - No aggregation during the pass: every aggregation (and every total)
//!   is computed later from the same raw lists without re-scanning rows
//! - Merging partial indices built from row chunks
//!
//! Architecture:
//! - Group keys are tuples of the dimension values' grouping text
//! - `cells[row_key][col_key]` holds one append-only raw list per value spec
//! - Each bucket also records its contributing source rows (for drill-down)
//!
//! Memory is O(rows): raw values are retained so that avg/min/max totals are
//! computed over the underlying values, not over cell aggregates.

use std::collections::hash_map::Entry;
use std::ops::Range;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::dataset::{cell_at, FlatDataset};
use crate::logging::{log_debug, log_enter, log_exit, CAT_GROUP};
use crate::normalizer::{NormalizedDimension, NormalizedPlan};
use crate::value::ScalarValue;

// ============================================================================
// GROUP KEY
// ============================================================================

/// A key representing one combination of dimension values.
///
/// Parts are the grouping texts (`ScalarValue::key_text`) in dimension order,
/// so equality is "renders the same". Ordering is lexicographic over the
/// tuple, which matches ordering the joined string when the separator sorts
/// before every other character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey {
    parts: SmallVec<[String; 2]>,
}

impl GroupKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupKey {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a key from raw values, applying the grouping coercion.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a ScalarValue>,
    {
        GroupKey {
            parts: values.into_iter().map(ScalarValue::key_text).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Composite display label, e.g. "East / Q1".
    pub fn label(&self, delimiter: &str) -> String {
        self.parts.join(delimiter)
    }
}

// ============================================================================
// CELL BUCKET
// ============================================================================

/// Raw values collected for one (row key, column key) intersection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellBucket {
    /// One raw list per value spec, in value spec order.
    pub values: Vec<Vec<ScalarValue>>,

    /// Source row indices (dataset order) that landed in this bucket.
    pub source_rows: Vec<usize>,
}

impl CellBucket {
    fn new(value_count: usize) -> Self {
        CellBucket {
            values: vec![Vec::new(); value_count],
            source_rows: Vec::new(),
        }
    }

    /// Raw list for one value spec (empty when out of range).
    pub fn values_for(&self, value_idx: usize) -> &[ScalarValue] {
        self.values.get(value_idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Appends another bucket's lists after this one's.
    fn append(&mut self, mut other: CellBucket) {
        if self.values.len() < other.values.len() {
            self.values.resize(other.values.len(), Vec::new());
        }
        for (list, extra) in self.values.iter_mut().zip(other.values.iter_mut()) {
            list.append(extra);
        }
        self.source_rows.append(&mut other.source_rows);
    }
}

// ============================================================================
// GROUPED INDEX
// ============================================================================

/// The grouping pass output. No aggregation has been applied yet.
#[derive(Debug, Clone, Default)]
pub struct GroupedIndex {
    /// Number of value specs per bucket.
    value_count: usize,

    /// All distinct row keys seen.
    unique_row_keys: FxHashSet<GroupKey>,

    /// All distinct column keys seen.
    unique_col_keys: FxHashSet<GroupKey>,

    /// Buckets keyed by row key, then column key.
    cells: FxHashMap<GroupKey, FxHashMap<GroupKey, CellBucket>>,

    /// Rows scanned.
    source_row_count: usize,

    /// Rows dropped by hidden items.
    filtered_row_count: usize,
}

impl GroupedIndex {
    pub fn new(value_count: usize) -> Self {
        GroupedIndex {
            value_count,
            ..GroupedIndex::default()
        }
    }

    pub fn value_count(&self) -> usize {
        self.value_count
    }

    pub fn source_row_count(&self) -> usize {
        self.source_row_count
    }

    pub fn filtered_row_count(&self) -> usize {
        self.filtered_row_count
    }

    pub fn row_key_count(&self) -> usize {
        self.unique_row_keys.len()
    }

    pub fn col_key_count(&self) -> usize {
        self.unique_col_keys.len()
    }

    /// Number of (row, column) intersections with at least one source row.
    pub fn populated_cells(&self) -> usize {
        self.cells.values().map(|cols| cols.len()).sum()
    }

    /// Distinct row keys in header order.
    pub fn sorted_row_keys(&self) -> Vec<GroupKey> {
        sorted_keys(&self.unique_row_keys)
    }

    /// Distinct column keys in header order.
    pub fn sorted_col_keys(&self) -> Vec<GroupKey> {
        sorted_keys(&self.unique_col_keys)
    }

    /// The bucket at an intersection, if any row landed there.
    pub fn bucket(&self, row_key: &GroupKey, col_key: &GroupKey) -> Option<&CellBucket> {
        self.cells.get(row_key).and_then(|cols| cols.get(col_key))
    }

    /// Raw list for one intersection and value spec. Absent ⇒ empty.
    pub fn values(&self, row_key: &GroupKey, col_key: &GroupKey, value_idx: usize) -> &[ScalarValue] {
        self.bucket(row_key, col_key)
            .map(|bucket| bucket.values_for(value_idx))
            .unwrap_or(&[])
    }

    /// Adds one source row to the bucket at (row_key, col_key).
    fn insert(
        &mut self,
        row_key: GroupKey,
        col_key: GroupKey,
        source_row: usize,
        row: &[ScalarValue],
        plan: &NormalizedPlan,
    ) {
        let row_cells = match self.cells.entry(row_key) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.unique_row_keys.insert(e.key().clone());
                e.insert(FxHashMap::default())
            }
        };

        let value_count = self.value_count;
        let bucket = match row_cells.entry(col_key) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.unique_col_keys.insert(e.key().clone());
                e.insert(CellBucket::new(value_count))
            }
        };

        for (list, spec) in bucket.values.iter_mut().zip(plan.value_specs.iter()) {
            list.push(cell_at(row, spec.index).clone());
        }
        bucket.source_rows.push(source_row);
    }

    /// Merges a later partial index into this one.
    ///
    /// Raw lists are concatenated (never aggregated), so merging chunk
    /// indices in chunk order yields exactly the single-pass index.
    pub fn merge(&mut self, other: GroupedIndex) {
        self.value_count = self.value_count.max(other.value_count);
        self.source_row_count += other.source_row_count;
        self.filtered_row_count += other.filtered_row_count;
        self.unique_row_keys.extend(other.unique_row_keys);
        self.unique_col_keys.extend(other.unique_col_keys);

        for (row_key, other_cols) in other.cells {
            let cols = self.cells.entry(row_key).or_default();
            for (col_key, bucket) in other_cols {
                match cols.entry(col_key) {
                    Entry::Occupied(mut e) => e.get_mut().append(bucket),
                    Entry::Vacant(e) => {
                        e.insert(bucket);
                    }
                }
            }
        }
    }
}

fn sorted_keys(keys: &FxHashSet<GroupKey>) -> Vec<GroupKey> {
    let mut sorted: Vec<GroupKey> = keys.iter().cloned().collect();
    sorted.sort_unstable();
    sorted
}

// ============================================================================
// GROUPING PASS
// ============================================================================

/// Builds the key for one row, or `None` when a hidden item excludes it.
fn row_group_key(row: &[ScalarValue], dimensions: &[NormalizedDimension]) -> Option<GroupKey> {
    let mut parts: SmallVec<[String; 2]> = SmallVec::with_capacity(dimensions.len());
    for dim in dimensions {
        let text = cell_at(row, dim.index).key_text();
        if dim.is_hidden(&text) {
            return None;
        }
        parts.push(text);
    }
    Some(GroupKey { parts })
}

/// Groups the rows in `range` (dataset row indices).
fn group_range(dataset: &FlatDataset, plan: &NormalizedPlan, range: Range<usize>) -> GroupedIndex {
    let mut index = GroupedIndex::new(plan.value_count());
    let start = range.start;

    for (offset, row) in dataset.rows[range].iter().enumerate() {
        index.source_row_count += 1;

        let keys = row_group_key(row, &plan.row_dimensions)
            .zip(row_group_key(row, &plan.column_dimensions));
        match keys {
            Some((row_key, col_key)) => index.insert(row_key, col_key, start + offset, row, plan),
            None => index.filtered_row_count += 1,
        }
    }

    index
}

/// Single pass over all rows.
pub fn group(dataset: &FlatDataset, plan: &NormalizedPlan) -> GroupedIndex {
    log_enter!(CAT_GROUP, "group", "rows={}", dataset.row_count());

    let index = group_range(dataset, plan, 0..dataset.row_count());

    log_exit!(
        CAT_GROUP,
        "group",
        "row_keys={} col_keys={} cells={} filtered={}",
        index.row_key_count(),
        index.col_key_count(),
        index.populated_cells(),
        index.filtered_row_count()
    );
    index
}

/// Groups fixed-size row chunks independently and merges them in chunk
/// order. With the `parallel` feature the chunks are grouped on the rayon
/// pool. The result equals `group`.
pub fn group_chunked(dataset: &FlatDataset, plan: &NormalizedPlan, chunk_size: usize) -> GroupedIndex {
    let row_count = dataset.row_count();
    if chunk_size == 0 || chunk_size >= row_count {
        return group(dataset, plan);
    }

    let ranges: Vec<Range<usize>> = (0..row_count)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(row_count))
        .collect();

    log_debug!(
        CAT_GROUP,
        "group_chunked rows={} chunks={} chunk_size={}",
        row_count,
        ranges.len(),
        chunk_size
    );

    let partials = group_ranges(dataset, plan, ranges);

    let mut merged = GroupedIndex::new(plan.value_count());
    for partial in partials {
        merged.merge(partial);
    }
    merged
}

#[cfg(feature = "parallel")]
fn group_ranges(dataset: &FlatDataset, plan: &NormalizedPlan, ranges: Vec<Range<usize>>) -> Vec<GroupedIndex> {
    use rayon::prelude::*;

    ranges
        .into_par_iter()
        .map(|range| group_range(dataset, plan, range))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn group_ranges(dataset: &FlatDataset, plan: &NormalizedPlan, ranges: Vec<Range<usize>>) -> Vec<GroupedIndex> {
    ranges
        .into_iter()
        .map(|range| group_range(dataset, plan, range))
        .collect()
}
