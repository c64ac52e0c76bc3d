#![allow(dead_code)]

use ndarray::Array2;
use velpick::synthetic::{SyntheticGatherConfig, synthetic_gather};
use velpick::{Gather, VelocityGrid};

/// Grid used against the default synthetic gather; index 10 is 2000 m/s.
pub fn velocity_grid() -> VelocityGrid {
    VelocityGrid::linspace(1500.0, 2500.0, 50.0).expect("velocity grid")
}

pub fn synthetic(num_times: usize) -> Gather {
    let config = SyntheticGatherConfig {
        num_times,
        ..SyntheticGatherConfig::default()
    };
    synthetic_gather(&config).expect("synthetic gather")
}

/// Every trace carries the same waveform and sits at zero offset.
pub fn duplicate_trace_gather(num_times: usize, num_offsets: usize) -> Gather {
    let samples = Array2::from_shape_fn((num_times, num_offsets), |(t, _)| {
        1.5 + (t as f32 * 0.21).sin()
    });
    let times = (0..num_times).map(|t| t as f32).collect();
    Gather::new(samples, vec![0.0; num_offsets], times, 1.0).expect("gather")
}

/// Strictly positive amplitudes on every sample, so windowed energies are never tiny.
pub fn dense_gather(num_times: usize) -> Gather {
    let offsets: Vec<f32> = (0..6).map(|idx| idx as f32 * 250.0).collect();
    let samples = Array2::from_shape_fn((num_times, offsets.len()), |(t, c)| {
        1.2 + 0.5 * (t as f32 * 0.3 + c as f32).sin()
    });
    let times = (0..num_times).map(|t| t as f32 * 0.004).collect();
    Gather::new(samples, offsets, times, 0.004).expect("gather")
}
