//! Benchmarks for the CPU side of a launch.
//!
//! Run with: `cargo bench`

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use fireburst::config::SpawnConfig;
use fireburst::prelude::*;
use fireburst::{motion, sample_shell, HeadlessResources};

fn bench_sample_shell(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_shell");

    for count in [100, 400, 1400, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = SmallRng::seed_from_u64(1);
            b.iter(|| black_box(sample_shell(count, 1.0, &mut rng)))
        });
    }

    group.finish();
}

fn bench_launch(c: &mut Criterion) {
    let palette = TexturePalette::procedural(8);

    c.bench_function("launch_and_finish", |b| {
        let mut ctx = RenderContext::default();
        let mut alloc = HeadlessAllocator::new();
        let mut fireworks = Fireworks::<HeadlessResources>::new();
        let mut spawner = SpawnController::new(SpawnConfig {
            seed: Some(3),
            ..SpawnConfig::default()
        });

        b.iter(|| {
            spawner.trigger(&mut fireworks, &mut ctx, &mut alloc, &palette);
            black_box(fireworks.update(&mut ctx, &mut alloc, Duration::from_secs(4)))
        })
    });
}

fn bench_motion(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(2);
    let particles = sample_shell(1400, 0.5, &mut rng);

    c.bench_function("displace_1400", |b| {
        b.iter(|| {
            for (rest, size, time) in particles.iter() {
                let p = black_box(0.4) * time;
                black_box(motion::displaced_position(rest, p));
                black_box(size * motion::size_multiplier(p));
            }
        })
    });
}

criterion_group!(benches, bench_sample_shell, bench_launch, bench_motion);
criterion_main!(benches);
