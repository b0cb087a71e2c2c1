//! Benchmarks for scene construction.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use slopefield::gpu::instanced::InstanceRaw;
use slopefield::gpu::lines;
use slopefield::{lattice, IntegerInterval, ReferenceField};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_build");
    let field = ReferenceField::default();

    for half_extent in [5, 10, 20] {
        group.bench_with_input(
            BenchmarkId::from_parameter(half_extent),
            &half_extent,
            |b, &n| b.iter(|| black_box(lattice::build(IntegerInterval::symmetric(n), 1, &field))),
        );
    }

    group.finish();
}

fn bench_upload_prep(c: &mut Criterion) {
    let scene = lattice::build(IntegerInterval::symmetric(10), 1, &ReferenceField::default());
    let mut group = c.benchmark_group("upload_prep");

    group.bench_function("arrow_instances", |b| {
        b.iter(|| {
            black_box(
                scene
                    .arrows
                    .iter()
                    .map(InstanceRaw::from_arrow)
                    .collect::<Vec<_>>(),
            )
        })
    });

    group.bench_function("label_segments", |b| b.iter(|| black_box(lines::label_segments(&scene))));

    group.finish();
}

criterion_group!(benches, bench_build, bench_upload_prep);
criterion_main!(benches);
