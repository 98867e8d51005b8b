//! Per-frame classification benchmarks
//!
//! Run with: cargo bench -p lakesim-detectors

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lakesim_core::{Frame, Grid, FILL_VALUE};
use lakesim_detectors::currents::LocalisedCurrentsClassifier;
use lakesim_detectors::upwelling::UpwellingClassifier;
use lakesim_detectors::{CurrentsParams, FrameClassifier, UpwellingParams};

/// Square lake with a dry border and a smooth temperature gradient
fn temperature_grid(size: usize) -> Grid {
    let mut values = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let border = row == 0 || col == 0 || row == size - 1 || col == size - 1;
            values.push(if border {
                FILL_VALUE
            } else {
                8.0 + 10.0 * (row as f64 / size as f64)
            });
        }
    }
    Grid::new(size, size, values).unwrap()
}

/// Velocity field with a few diagonal jets
fn velocity_grids(size: usize) -> (Grid, Grid) {
    let mut u = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            u.push(if (row + col) % 17 < 3 { 0.8 } else { 0.05 });
        }
    }
    let v = vec![0.0; size * size];
    (Grid::new(size, size, u).unwrap(), Grid::new(size, size, v).unwrap())
}

fn benchmark_upwelling(c: &mut Criterion) {
    let mut classifier = UpwellingClassifier::new(UpwellingParams {
        depth: 1.0,
        centroid_difference: 2.0,
        merge: 0.0,
    });
    let timestamp = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let mut group = c.benchmark_group("Upwelling");
    for size in [64, 256] {
        let frame = Frame::scalar(timestamp, temperature_grid(size));
        group.bench_with_input(BenchmarkId::new("classify", size), &frame, |b, frame| {
            b.iter(|| classifier.classify(black_box(frame)).unwrap())
        });
    }
    group.finish();
}

fn benchmark_localised_currents(c: &mut Criterion) {
    let mut classifier = LocalisedCurrentsClassifier::new(CurrentsParams {
        depth: 1.0,
        threshold: 0.5,
        min_area: 0.001,
        max_area: 0.05,
        total_area: 1.0,
        merge: 0.0,
    });
    let timestamp = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let mut group = c.benchmark_group("Localised_Currents");
    for size in [64, 256] {
        let (u, v) = velocity_grids(size);
        let frame = Frame::vector(timestamp, u, v);
        classifier.reset();
        group.bench_with_input(BenchmarkId::new("classify", size), &frame, |b, frame| {
            b.iter(|| classifier.classify(black_box(frame)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_upwelling, benchmark_localised_currents);
criterion_main!(benches);
