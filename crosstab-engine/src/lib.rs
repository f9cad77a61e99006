//! FILENAME: crosstab-engine/src/lib.rs
//! Cross-tab (pivot) aggregation engine.
//!
//! Takes a flat, already-materialized result set plus a pivot plan and
//! produces a dense matrix of aggregated values with row, column and grand
//! totals. The engine is a pure function of its inputs: no I/O, no global
//! state, nothing retained between calls.
//!
//! Layers:
//! - `value`: Scalar cell values and their coercions
//! - `dataset`: The flat input (columns + rows)
//! - `definition`: Serializable plan (what the pivot IS)
//! - `normalizer`: Plan validation and column resolution
//! - `cache`: Grouping index over raw values (HOW we group)
//! - `engine`: Aggregation and totals (HOW we calculate)
//! - `view`: Output matrix (WHAT the caller renders)

pub mod logging;

pub mod value;
pub mod dataset;
pub mod definition;
pub mod error;
pub mod normalizer;
pub mod cache;
pub mod view;
pub mod engine;

pub use value::ScalarValue;
pub use dataset::FlatDataset;
pub use definition::*;
pub use error::{ConfigIncomplete, PlanArea, PivotConfigError};
pub use normalizer::{normalize, NormalizedDimension, NormalizedPlan, NormalizedValue, PlanStatus};
pub use cache::{group, group_chunked, CellBucket, GroupKey, GroupedIndex};
pub use view::*;
pub use engine::{aggregate, build, calculate_pivot, drill_down};
