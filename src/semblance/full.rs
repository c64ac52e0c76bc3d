use ndarray::Array2;
use rayon::prelude::*;

use super::SemblancePanel;
use super::energy::Workspace;
use crate::gather::{Gather, VelocityGrid};

/// Semblance of every trial velocity at every time sample.
///
/// Velocities are processed in parallel; each worker owns one scratch
/// workspace and produces whole columns of the panel.
pub fn calc_semblance(gather: &Gather, velocities: &VelocityGrid, window: usize) -> SemblancePanel {
    let num_times = gather.num_times();
    let num_offsets = gather.num_offsets();
    let columns: Vec<Vec<f32>> = velocities
        .values()
        .par_iter()
        .map_init(
            || Workspace::new(num_times, num_offsets),
            |workspace, &velocity| {
                let energy = workspace.load(gather, velocity, 0, num_times - 1);
                (0..num_times)
                    .map(|t| energy.semblance_at(t, window))
                    .collect()
            },
        )
        .collect();

    let mut values = Array2::zeros((num_times, velocities.len()));
    for (velocity_index, column) in columns.into_iter().enumerate() {
        for (cell, value) in values.column_mut(velocity_index).iter_mut().zip(column) {
            *cell = value;
        }
    }
    SemblancePanel::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn duplicate_trace_gather() -> Gather {
        let samples = Array2::from_shape_fn((32, 4), |(t, _)| ((t as f32) * 0.7).sin() + 1.5);
        let times = (0..32).map(|t| t as f32 * 0.004).collect();
        Gather::new(samples, vec![0.0; 4], times, 0.004).unwrap()
    }

    #[test]
    fn duplicate_traces_are_fully_coherent_at_any_velocity() {
        let gather = duplicate_trace_gather();
        let grid = VelocityGrid::linspace(1500.0, 2500.0, 250.0).unwrap();
        let panel = calc_semblance(&gather, &grid, 2);
        assert_eq!(panel.shape(), (32, 5));
        for value in panel.values() {
            assert!((value - 1.0).abs() < 1e-4, "semblance {value}");
        }
    }

    #[test]
    fn values_stay_in_unit_range() {
        let samples = Array2::from_shape_fn((40, 3), |(t, c)| ((t * 7 + c * 13) % 11) as f32 - 5.0);
        let times = (0..40).map(|t| t as f32).collect();
        let gather = Gather::new(samples, vec![0.0, 3.0, 6.0], times, 1.0).unwrap();
        let grid = VelocityGrid::linspace(1.0, 4.0, 0.5).unwrap();
        let panel = calc_semblance(&gather, &grid, 1);
        for value in panel.values() {
            assert!((0.0..=1.0 + 1e-5).contains(value));
        }
    }

    #[test]
    fn zero_window_uses_single_row() {
        let samples = Array2::from_shape_fn((3, 2), |(t, c)| if t == 1 && c == 1 { -1.0 } else { 1.0 });
        let gather = Gather::new(samples, vec![0.0, 0.0], vec![0.0, 1.0, 2.0], 1.0).unwrap();
        let grid = VelocityGrid::new(vec![1.0]).unwrap();
        let panel = calc_semblance(&gather, &grid, 0);
        assert!((panel.values()[[0, 0]] - 1.0).abs() < 1e-5);
        assert!(panel.values()[[1, 0]].abs() < 1e-6);
    }
}
