//! Per-frame CPU cost of the morph.
//!
//! Run with: `cargo bench --bench field_update`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_morph::prelude::*;

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_update");
    for count in [4_000u32, 50_000, 250_000] {
        let mut field =
            ParticleField::new(FieldConfig::default().with_particle_count(count).with_seed(1))
                .unwrap();
        let mut t = 0.0f32;
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                t += 1.0 / 60.0;
                black_box(field.update(black_box(0.5), t));
            })
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("field_build_4000", |b| {
        b.iter(|| ParticleField::new(black_box(FieldConfig::default().with_seed(1))).unwrap())
    });
}

criterion_group!(benches, bench_update, bench_build);
criterion_main!(benches);
