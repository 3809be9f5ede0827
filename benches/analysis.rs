use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fisher::anova::analyze;
use fisher::design::{DesignShape, ExperimentalDesign};
use fisher::dist;
use ndarray::Array2;

/// Deterministic synthetic trial with a treatment trend, block effects,
/// and cell-dependent noise.
fn synthetic_design(treatments: usize, blocks: usize) -> ExperimentalDesign {
    let shape = DesignShape::new(treatments, blocks).unwrap();
    let data = Array2::from_shape_fn((blocks, treatments), |(i, j)| {
        10.0 + 2.0 * j as f64 + 0.3 * i as f64 + 0.1 * ((i * treatments + j) % 5) as f64
    });
    ExperimentalDesign::from_matrix(shape, data).unwrap()
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analyze");

    for (t, b) in [(4, 3), (6, 4), (10, 10)] {
        let design = synthetic_design(t, b);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{t}x{b}")),
            &design,
            |bench, design| {
                bench.iter(|| analyze(design, 0.05).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_quantile(c: &mut Criterion) {
    let mut group = c.benchmark_group("FQuantile");

    for df1 in [2, 5, 9] {
        group.bench_with_input(BenchmarkId::from_parameter(df1), &df1, |bench, &df1| {
            bench.iter(|| dist::quantile(0.05, df1, 12).unwrap());
        });
    }
    group.finish();
}

fn bench_survival(c: &mut Criterion) {
    c.bench_function("FSurvival", |bench| {
        bench.iter(|| dist::survival(3.71, 3, 10));
    });
}

criterion_group!(benches, bench_analyze, bench_quantile, bench_survival);
criterion_main!(benches);
