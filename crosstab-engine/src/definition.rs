//! FILENAME: crosstab-engine/src/definition.rs
//! Pivot Plan - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a cross-tab.
//! These structures are designed to be:
//! - Serializable (plans arrive from the configuration layer as JSON)
//! - Trusted in shape, untrusted in content (column names, aggregation names)
//! - Immutable snapshots of caller intent

use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for value specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    Sum,
    Count,
    #[serde(rename = "avg")]
    Average,
    Min,
    Max,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Count
    }
}

impl AggregationType {
    /// Canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            AggregationType::Sum => "sum",
            AggregationType::Count => "count",
            AggregationType::Average => "avg",
            AggregationType::Min => "min",
            AggregationType::Max => "max",
        }
    }

    /// Strict lookup of the exact lowercase names; `None` otherwise.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(AggregationType::Sum),
            "count" => Some(AggregationType::Count),
            "avg" => Some(AggregationType::Average),
            "min" => Some(AggregationType::Min),
            "max" => Some(AggregationType::Max),
            _ => None,
        }
    }
}

/// Resolves an aggregation name. Total: unrecognized names become `Count`.
pub fn resolve_aggregation(name: &str) -> AggregationType {
    AggregationType::from_name(name).unwrap_or(AggregationType::Count)
}

// ============================================================================
// FIELD DEFINITIONS
// ============================================================================

/// A column placed in the Row or Column area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    /// Name of the source column.
    pub key: String,

    /// Display label.
    pub label: String,

    /// Items that are hidden (filtered out), by their grouping text.
    /// A row whose value renders to one of these is dropped entirely.
    #[serde(default)]
    pub hidden_items: Vec<String>,
}

impl Dimension {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Dimension {
            key: key.into(),
            label: label.into(),
            hidden_items: Vec::new(),
        }
    }

    /// Dimension labelled with its own column name.
    pub fn column(key: impl Into<String>) -> Self {
        let key = key.into();
        Dimension::new(key.clone(), key)
    }

    pub fn with_hidden_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_items = items.into_iter().map(Into::into).collect();
        self
    }
}

/// A column placed in the Values area with its aggregation name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSpec {
    /// Name of the source column.
    pub key: String,

    /// Display label (e.g., "Sum of Revenue").
    pub label: String,

    /// Aggregation name as sent by the configuration layer.
    pub aggregation: String,
}

impl ValueSpec {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        aggregation: impl Into<String>,
    ) -> Self {
        ValueSpec {
            key: key.into(),
            label: label.into(),
            aggregation: aggregation.into(),
        }
    }

    /// Value spec labelled "<Aggregation> of <column>".
    pub fn of(key: impl Into<String>, aggregation: AggregationType) -> Self {
        let key = key.into();
        let label = format!("{} of {}", title_case(aggregation.name()), key);
        ValueSpec::new(key, label, aggregation.name())
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Controls which totals are produced and how composite labels read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PivotOptions {
    /// Joins the parts of a multi-dimension header label.
    pub label_delimiter: String,

    /// Produce per-row totals.
    pub show_row_totals: bool,

    /// Produce per-column totals.
    pub show_column_totals: bool,

    /// Produce grand totals.
    pub show_grand_totals: bool,
}

impl Default for PivotOptions {
    fn default() -> Self {
        PivotOptions {
            label_delimiter: " / ".to_string(),
            show_row_totals: true,
            show_column_totals: true,
            show_grand_totals: true,
        }
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The complete, serializable description of a cross-tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotPlan {
    /// Fields placed in the Row area (ordered from outer to inner).
    pub row_dimensions: Vec<Dimension>,

    /// Fields placed in the Column area (ordered from outer to inner).
    pub column_dimensions: Vec<Dimension>,

    /// Fields placed in the Values area. Order fixes the order of values
    /// within each output cell.
    pub value_specs: Vec<ValueSpec>,

    /// Layout and totals options.
    #[serde(default)]
    pub options: PivotOptions,
}

impl PivotPlan {
    pub fn new() -> Self {
        PivotPlan::default()
    }

    pub fn row(mut self, dimension: Dimension) -> Self {
        self.row_dimensions.push(dimension);
        self
    }

    pub fn column(mut self, dimension: Dimension) -> Self {
        self.column_dimensions.push(dimension);
        self
    }

    pub fn value(mut self, spec: ValueSpec) -> Self {
        self.value_specs.push(spec);
        self
    }

    pub fn with_options(mut self, options: PivotOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(resolve_aggregation("sum"), AggregationType::Sum);
        assert_eq!(resolve_aggregation("count"), AggregationType::Count);
        assert_eq!(resolve_aggregation("avg"), AggregationType::Average);
        assert_eq!(resolve_aggregation("min"), AggregationType::Min);
        assert_eq!(resolve_aggregation("max"), AggregationType::Max);
    }

    #[test]
    fn test_near_miss_names_fall_back_to_count() {
        for name in ["average", "Average", "SUM", "Avg", " max ", " MIN ", "count "] {
            assert_eq!(resolve_aggregation(name), AggregationType::Count, "{:?}", name);
            assert_eq!(AggregationType::from_name(name), None, "{:?}", name);
        }
    }

    #[test]
    fn test_resolve_falls_back_to_count() {
        assert_eq!(resolve_aggregation("bogus"), AggregationType::Count);
        assert_eq!(resolve_aggregation(""), AggregationType::Count);
        assert_eq!(resolve_aggregation("median"), AggregationType::Count);
        assert_eq!(AggregationType::from_name("bogus"), None);
    }

    #[test]
    fn test_value_spec_of_label() {
        let spec = ValueSpec::of("revenue", AggregationType::Average);
        assert_eq!(spec.label, "Avg of revenue");
        assert_eq!(spec.aggregation, "avg");
    }

    #[test]
    fn test_plan_deserializes_camel_case() {
        let json = r#"{
            "rowDimensions": [{"key": "region", "label": "Region", "hiddenItems": ["North"]}],
            "columnDimensions": [{"key": "month", "label": "Month"}],
            "valueSpecs": [{"key": "revenue", "label": "Revenue", "aggregation": "sum"}]
        }"#;
        let plan: PivotPlan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.row_dimensions[0].hidden_items, vec!["North".to_string()]);
        assert!(plan.column_dimensions[0].hidden_items.is_empty());
        assert_eq!(plan.value_specs[0].aggregation, "sum");
        assert_eq!(plan.options, PivotOptions::default());
    }

    #[test]
    fn test_partial_options_keep_defaults() {
        let options: PivotOptions = serde_json::from_str(r#"{"showRowTotals": false}"#).unwrap();
        assert!(!options.show_row_totals);
        assert!(options.show_column_totals);
        assert_eq!(options.label_delimiter, " / ");
    }
}
