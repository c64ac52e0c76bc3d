use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use velpick::synthetic::{SyntheticGatherConfig, synthetic_gather};
use velpick::{Gather, ReferenceCurve, VelocityGrid, calc_partial_semblance, calc_semblance};

const WINDOW: usize = 4;

fn setup_gather(num_times: usize) -> Gather {
    let config = SyntheticGatherConfig {
        num_times,
        offsets: (0..24).map(|idx| idx as f32 * 100.0).collect(),
        ..SyntheticGatherConfig::default()
    };
    synthetic_gather(&config).expect("synthetic gather")
}

fn bench_full_semblance(c: &mut Criterion) {
    let grid = VelocityGrid::linspace(1500.0, 2500.0, 10.0).expect("velocity grid");
    for num_times in [250usize, 1_000] {
        let gather = setup_gather(num_times);
        c.bench_with_input(
            BenchmarkId::new("full_semblance", num_times),
            &gather,
            |b, gather| {
                b.iter(|| calc_semblance(black_box(gather), &grid, WINDOW));
            },
        );
    }
}

fn bench_bounded_semblance(c: &mut Criterion) {
    let grid = VelocityGrid::linspace(1500.0, 2500.0, 10.0).expect("velocity grid");
    let gather = setup_gather(1_000);
    let reference = ReferenceCurve::new(vec![(0.0, 2000.0)]).expect("reference");
    for tolerance in [0.02f32, 0.1] {
        let bounds = reference
            .bounds(gather.times(), &grid, tolerance)
            .expect("bounds");
        c.bench_with_input(
            BenchmarkId::new("bounded_semblance", tolerance),
            &bounds,
            |b, bounds| {
                b.iter(|| {
                    calc_partial_semblance(black_box(&gather), &grid, bounds, WINDOW)
                        .expect("partial semblance")
                });
            },
        );
    }
}

criterion_group!(benches, bench_full_semblance, bench_bounded_semblance);
criterion_main!(benches);
