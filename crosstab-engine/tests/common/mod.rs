//! FILENAME: tests/common/mod.rs
//! Fixtures and assertion helpers for the cross-tab integration tests.

use crosstab_engine::{
    calculate_pivot, Dimension, FlatDataset, GroupKey, PivotPlan, PivotResult, ScalarValue,
    ValueSpec,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// The three-row revenue table used by the reference scenarios.
pub struct RevenueFixture;

impl RevenueFixture {
    pub fn dataset() -> FlatDataset {
        FlatDataset::from_rows(
            ["region", "month", "revenue"],
            vec![
                vec![ScalarValue::from("East"), ScalarValue::from("Jan"), ScalarValue::from(100)],
                vec![ScalarValue::from("East"), ScalarValue::from("Feb"), ScalarValue::from(200)],
                vec![ScalarValue::from("West"), ScalarValue::from("Jan"), ScalarValue::from(50)],
            ],
        )
    }

    /// region × month with a single revenue value spec.
    pub fn plan(aggregation: &str) -> PivotPlan {
        PivotPlan::new()
            .row(Dimension::new("region", "Region"))
            .column(Dimension::new("month", "Month"))
            .value(ValueSpec::new("revenue", "Revenue", aggregation))
    }
}

/// A larger sales table with three groupable columns.
pub struct SalesFixture;

impl SalesFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Sales", "Quantity"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Widget", "Q1", 10000.0, 100.0),
            ("North", "Widget", "Q2", 12000.0, 120.0),
            ("North", "Gadget", "Q1", 8000.0, 80.0),
            ("North", "Gadget", "Q2", 9000.0, 90.0),
            ("South", "Widget", "Q1", 15000.0, 150.0),
            ("South", "Widget", "Q2", 14000.0, 140.0),
            ("South", "Gadget", "Q1", 11000.0, 110.0),
            ("South", "Gadget", "Q2", 13000.0, 130.0),
            ("East", "Widget", "Q1", 9000.0, 90.0),
            ("East", "Widget", "Q2", 11000.0, 110.0),
            ("East", "Gadget", "Q1", 7000.0, 70.0),
            ("East", "Gadget", "Q2", 8500.0, 85.0),
        ]
    }

    pub fn dataset() -> FlatDataset {
        Self::dataset_from(Self::data())
    }

    /// Same rows in reverse order.
    pub fn reversed_dataset() -> FlatDataset {
        let mut data = Self::data();
        data.reverse();
        Self::dataset_from(data)
    }

    fn dataset_from(data: Vec<(&'static str, &'static str, &'static str, f64, f64)>) -> FlatDataset {
        let mut dataset = FlatDataset::new(Self::headers().into_iter().map(String::from).collect());
        dataset.reserve(data.len());
        for (region, product, quarter, sales, quantity) in data {
            dataset.push_row(vec![
                ScalarValue::from(region),
                ScalarValue::from(product),
                ScalarValue::from(quarter),
                ScalarValue::from(sales),
                ScalarValue::from(quantity),
            ]);
        }
        dataset
    }
}

// ============================================================================
// HELPERS
// ============================================================================

pub fn key(parts: &[&str]) -> GroupKey {
    GroupKey::new(parts.iter().copied())
}

/// Runs the full pipeline and expects a ready matrix.
pub fn calculate_ready(dataset: &FlatDataset, plan: &PivotPlan) -> PivotResult {
    match calculate_pivot(dataset, plan) {
        Ok(outcome) => outcome.into_result().expect("plan should be ready"),
        Err(e) => panic!("calculation failed: {}", e),
    }
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Assert that two numbers agree to within floating-point noise.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}

/// Assert the first value of a cell.
pub fn assert_cell(result: &PivotResult, row: &[&str], col: &[&str], expected: f64) {
    match result.cell(&key(row), &key(col)) {
        Some(values) => assert_close(values[0], expected),
        None => panic!("no cell at {:?} x {:?}", row, col),
    }
}
