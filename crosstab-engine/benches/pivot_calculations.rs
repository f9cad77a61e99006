//! FILENAME: benches/pivot_calculations.rs
//! Criterion benchmarks for the full pipeline and the grouping pass.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crosstab_engine::{
    calculate_pivot, group, group_chunked, normalize, Dimension, FlatDataset, NormalizedPlan,
    PivotPlan, PlanStatus, ScalarValue, ValueSpec,
};

const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];
const PRODUCTS: [&str; 8] = ["Widget", "Gadget", "Gizmo", "Doohickey", "Sprocket", "Bolt", "Nut", "Gear"];
const QUARTERS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

fn build_dataset(rows: usize) -> FlatDataset {
    let mut dataset = FlatDataset::new(
        ["Region", "Product", "Quarter", "Sales", "Quantity"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    dataset.reserve(rows);
    for i in 0..rows {
        dataset.push_row(vec![
            ScalarValue::from(REGIONS[i % REGIONS.len()]),
            ScalarValue::from(PRODUCTS[(i / 7) % PRODUCTS.len()]),
            ScalarValue::from(QUARTERS[(i / 3) % QUARTERS.len()]),
            ScalarValue::from(((i * 37) % 10_000) as f64 + 0.5),
            ScalarValue::from((i % 120) as i64),
        ]);
    }
    dataset
}

fn build_plan() -> PivotPlan {
    PivotPlan::new()
        .row(Dimension::column("Region"))
        .row(Dimension::column("Product"))
        .column(Dimension::column("Quarter"))
        .value(ValueSpec::new("Sales", "Sum of Sales", "sum"))
        .value(ValueSpec::new("Quantity", "Avg Quantity", "avg"))
        .value(ValueSpec::new("Sales", "Max Sales", "max"))
}

fn normalized(dataset: &FlatDataset, plan: &PivotPlan) -> NormalizedPlan {
    match normalize(dataset, plan) {
        Ok(PlanStatus::Ready(plan)) => plan,
        _ => panic!("benchmark plan must be ready"),
    }
}

fn bench_calculate_pivot(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("calculate_pivot");
    let plan = build_plan();

    for rows in [1_000usize, 10_000, 100_000] {
        let dataset = build_dataset(rows);
        group_bench.throughput(Throughput::Elements(rows as u64));
        group_bench.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, dataset| {
            b.iter(|| calculate_pivot(black_box(dataset), black_box(&plan)))
        });
    }
    group_bench.finish();
}

fn bench_grouping(c: &mut Criterion) {
    let rows = 200_000usize;
    let dataset = build_dataset(rows);
    let plan = normalized(&dataset, &build_plan());

    let mut group_bench = c.benchmark_group("grouping");
    group_bench.throughput(Throughput::Elements(rows as u64));
    group_bench.bench_function("single_pass", |b| b.iter(|| group(black_box(&dataset), &plan)));
    for chunk_size in [10_000usize, 50_000] {
        group_bench.bench_with_input(
            BenchmarkId::new("chunked", chunk_size),
            &chunk_size,
            |b, &chunk_size| b.iter(|| group_chunked(black_box(&dataset), &plan, chunk_size)),
        );
    }
    group_bench.finish();
}

criterion_group!(benches, bench_calculate_pivot, bench_grouping);
criterion_main!(benches);
