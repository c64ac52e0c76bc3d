use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use velpick::synthetic::{SyntheticGatherConfig, synthetic_gather};
use velpick::{PathSearch, SemblancePanel, VelocityGrid, calc_semblance, find_local_maximas};

fn setup_panel() -> (SemblancePanel, Vec<f32>, VelocityGrid) {
    let config = SyntheticGatherConfig {
        num_times: 200,
        velocity_gradient: 500.0,
        ..SyntheticGatherConfig::default()
    };
    let gather = synthetic_gather(&config).expect("synthetic gather");
    let grid = VelocityGrid::linspace(1500.0, 2500.0, 50.0).expect("velocity grid");
    let panel = calc_semblance(&gather, &grid, 4);
    (panel, gather.times().to_vec(), grid)
}

fn bench_peak_detection(c: &mut Criterion) {
    let (panel, times, grid) = setup_panel();
    for area_factor in [0.1f32, 0.25] {
        c.bench_with_input(
            BenchmarkId::new("find_local_maximas", area_factor),
            &area_factor,
            |b, &area_factor| {
                b.iter(|| {
                    find_local_maximas(black_box(&panel), &times, &grid, area_factor, 1e-6)
                        .expect("peaks")
                });
            },
        );
    }
}

fn bench_path_search(c: &mut Criterion) {
    let (panel, times, grid) = setup_panel();
    let search = PathSearch::new(0.25);
    let picks = find_local_maximas(&panel, &times, &grid, search.area_factor, search.peak_tolerance)
        .expect("peaks");
    c.bench_with_input(
        BenchmarkId::new("path_search", picks.len()),
        &picks,
        |b, picks| {
            b.iter(|| {
                search
                    .search(black_box(&panel), &times, &grid, picks)
                    .expect("path search")
            });
        },
    );
}

criterion_group!(benches, bench_peak_detection, bench_path_search);
criterion_main!(benches);
