mod common;

use std::hint::black_box;

use clearing_scatter::path::spline::sample_catmull_rom;
use clearing_scatter::prelude::{PathPoint, PathSettings, SplineCache, SurroundSettings};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

const RESOLUTIONS: [f32; 4] = [4.0, 1.0, 0.5, 0.1];

fn winding_points(count: usize) -> Vec<PathPoint> {
    (0..count)
        .map(|i| {
            let t = i as f32;
            PathPoint::new(Vec3::new(t * 12.0, 0.0, (t * 0.7).sin() * 25.0))
                .with_width(4.0 + (t * 0.3).cos())
        })
        .collect()
}

fn spline_benches(c: &mut Criterion) {
    let points = winding_points(32);
    let positions: Vec<Vec3> = points.iter().map(|p| p.position).collect();

    let mut group = c.benchmark_group("spline/catmull_rom");
    for &resolution in &RESOLUTIONS {
        let expected = sample_catmull_rom(&positions, resolution, false).samples.len();
        group.throughput(common::elements_throughput(expected));
        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &resolution,
            |b, &r| {
                b.iter(|| black_box(sample_catmull_rom(&positions, r, false).samples.len()));
            },
        );
    }
    group.finish();

    let mut group = c.benchmark_group("spline/cache_build");
    for &resolution in &RESOLUTIONS {
        let settings = PathSettings::new(resolution)
            .with_width(true)
            .with_surround(SurroundSettings::new(3.0).with_blend(true, true, 6.0));
        let expected = SplineCache::build(&points, &settings, true).len();
        group.throughput(common::elements_throughput(expected));
        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &resolution,
            |b, _| {
                b.iter(|| black_box(SplineCache::build(&points, &settings, true).len()));
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = spline_benches
}
criterion_main!(benches);
