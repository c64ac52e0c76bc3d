use ndarray::{Array2, s};

use super::SEMBLANCE_EPSILON;
use crate::gather::Gather;
use crate::nmo::correct_rows;

/// Per-worker scratch space reused across trial velocities.
pub(super) struct Workspace {
    corrected: Array2<f32>,
    stack: Vec<f64>,
    trace: Vec<f64>,
}

impl Workspace {
    pub(super) fn new(num_times: usize, num_offsets: usize) -> Self {
        Self {
            corrected: Array2::zeros((num_times, num_offsets)),
            stack: vec![0.0; num_times],
            trace: vec![0.0; num_times],
        }
    }

    /// NMO-correct rows `first..=last` with `velocity` and accumulate their energies.
    pub(super) fn load(&mut self, gather: &Gather, velocity: f32, first: usize, last: usize) -> EnergyWindow<'_> {
        let len = last + 1 - first;
        let mut corrected = self.corrected.slice_mut(s![..len, ..]);
        correct_rows(gather, velocity, first, corrected.view_mut());
        for (local, row) in corrected.rows().into_iter().enumerate() {
            let mut sum = 0.0_f64;
            let mut sum_sq = 0.0_f64;
            for &amplitude in row {
                let amplitude = amplitude as f64;
                sum += amplitude;
                sum_sq += amplitude * amplitude;
            }
            self.stack[local] = sum * sum;
            self.trace[local] = sum_sq;
        }
        EnergyWindow {
            stack: &self.stack[..len],
            trace: &self.trace[..len],
            first,
            num_times: gather.num_times(),
            num_offsets: gather.num_offsets(),
        }
    }
}

/// Stack and trace energy for a contiguous run of time rows.
pub(super) struct EnergyWindow<'a> {
    stack: &'a [f64],
    trace: &'a [f64],
    first: usize,
    num_times: usize,
    num_offsets: usize,
}

impl EnergyWindow<'_> {
    /// Semblance at absolute row `t`; the clipped window must lie inside the loaded rows.
    pub(super) fn semblance_at(&self, t: usize, window: usize) -> f32 {
        let lo = t.saturating_sub(window);
        let hi = (t + window).min(self.num_times - 1);
        debug_assert!(lo >= self.first && hi - self.first < self.stack.len());
        let mut numerator = 0.0_f64;
        let mut denominator = 0.0_f64;
        for local in (lo - self.first)..=(hi - self.first) {
            numerator += self.stack[local];
            denominator += self.trace[local];
        }
        (numerator / (self.num_offsets as f64 * denominator + SEMBLANCE_EPSILON)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn identical_columns_give_unit_semblance() {
        let samples = Array2::from_shape_fn((5, 3), |(t, _)| 1.0 + t as f32);
        let gather = Gather::new(samples, vec![0.0; 3], (0..5).map(|t| t as f32).collect(), 1.0)
            .unwrap();
        let mut workspace = Workspace::new(5, 3);
        let energy = workspace.load(&gather, 1000.0, 0, 4);
        for t in 0..5 {
            assert!((energy.semblance_at(t, 1) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn opposite_columns_cancel() {
        let samples = Array2::from_shape_fn((4, 2), |(_, c)| if c == 0 { 1.0 } else { -1.0 });
        let gather = Gather::new(samples, vec![0.0; 2], (0..4).map(|t| t as f32).collect(), 1.0)
            .unwrap();
        let mut workspace = Workspace::new(4, 2);
        let energy = workspace.load(&gather, 1000.0, 0, 3);
        assert!(energy.semblance_at(2, 0).abs() < 1e-6);
    }

    #[test]
    fn silent_rows_are_zero_not_nan() {
        let gather = Gather::new(Array2::zeros((3, 2)), vec![0.0, 1.0], vec![0.0, 1.0, 2.0], 1.0)
            .unwrap();
        let mut workspace = Workspace::new(3, 2);
        let energy = workspace.load(&gather, 1.0, 0, 2);
        assert_eq!(energy.semblance_at(1, 1), 0.0);
    }
}
