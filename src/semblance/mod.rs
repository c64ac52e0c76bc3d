//! Semblance panels over a (time, velocity) grid.
//!
//! Semblance at `(t, v)` is the ratio of windowed stack energy to windowed
//! trace energy of the gather after NMO correction with velocity `v`:
//!
//! `sum((Σ_o a)²) / (N · sum(Σ_o a²) + ε)`
//!
//! summed over `t - window ..= t + window`, clipped to the record.

mod bounded;
mod energy;
mod full;

use ndarray::Array2;

pub use bounded::calc_partial_semblance;
pub use full::calc_semblance;

use crate::bounds::ReferenceCurve;
use crate::error::{VelocityError, ensure_len};
use crate::gather::VelocityGrid;

/// Guard added to the denominator so silent windows yield zero, not NaN.
pub const SEMBLANCE_EPSILON: f64 = 1e-6;

/// Coherence scores laid out as (time, velocity), plus which cells were computed.
#[derive(Debug, Clone, PartialEq)]
pub struct SemblancePanel {
    values: Array2<f32>,
    evaluated: Array2<bool>,
}

impl SemblancePanel {
    /// Wrap a fully evaluated panel.
    pub fn from_values(values: Array2<f32>) -> Self {
        let evaluated = Array2::from_elem(values.raw_dim(), true);
        Self { values, evaluated }
    }

    pub(crate) fn with_mask(values: Array2<f32>, evaluated: Array2<bool>) -> Self {
        debug_assert_eq!(values.dim(), evaluated.dim());
        Self { values, evaluated }
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// Mask of computed cells. Unevaluated cells hold `0.0` in [`Self::values`].
    pub fn evaluated(&self) -> &Array2<bool> {
        &self.evaluated
    }

    pub fn is_evaluated(&self, time_index: usize, velocity_index: usize) -> bool {
        self.evaluated
            .get((time_index, velocity_index))
            .copied()
            .unwrap_or(false)
    }

    pub fn evaluated_count(&self) -> usize {
        self.evaluated.iter().filter(|cell| **cell).count()
    }

    /// `(num_times, num_velocities)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn num_times(&self) -> usize {
        self.values.nrows()
    }

    pub fn num_velocities(&self) -> usize {
        self.values.ncols()
    }

    pub fn into_values(self) -> Array2<f32> {
        self.values
    }

    /// Velocity index of the largest value in each time row (first on ties).
    pub fn argmax_per_time(&self) -> Vec<usize> {
        self.values
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0usize;
                for (idx, value) in row.iter().enumerate() {
                    if *value > row[best] {
                        best = idx;
                    }
                }
                best
            })
            .collect()
    }
}

/// Reference curve following the per-time maximum of `panel`.
///
/// Used as the prior for a bounded refinement pass over the same gather.
pub fn reference_from_panel(
    panel: &SemblancePanel,
    times: &[f32],
    velocities: &VelocityGrid,
) -> Result<ReferenceCurve, VelocityError> {
    ensure_len("panel time rows", times.len(), panel.num_times())?;
    ensure_len("panel velocity columns", velocities.len(), panel.num_velocities())?;
    let points = panel
        .argmax_per_time()
        .into_iter()
        .zip(times.iter())
        .map(|(velocity_index, &time)| (time, velocities.values()[velocity_index]))
        .collect();
    ReferenceCurve::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn argmax_takes_first_maximum() {
        let panel = SemblancePanel::from_values(array![[0.1, 0.5, 0.5], [0.9, 0.2, 0.3]]);
        assert_eq!(panel.argmax_per_time(), vec![1, 0]);
    }

    #[test]
    fn reference_follows_row_maxima() {
        let panel = SemblancePanel::from_values(array![[0.1, 0.7], [0.9, 0.2]]);
        let grid = VelocityGrid::new(vec![1000.0, 2000.0]).unwrap();
        let curve = reference_from_panel(&panel, &[0.0, 1.0], &grid).unwrap();
        assert_eq!(curve.points(), &[(0.0, 2000.0), (1.0, 1000.0)]);
    }

    #[test]
    fn full_panel_reports_every_cell_evaluated() {
        let panel = SemblancePanel::from_values(Array2::zeros((3, 2)));
        assert_eq!(panel.evaluated_count(), 6);
        assert!(panel.is_evaluated(2, 1));
        assert!(!panel.is_evaluated(3, 0));
    }
}
