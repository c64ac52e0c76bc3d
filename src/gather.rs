//! Validated inputs for velocity analysis: a common-midpoint gather with its
//! axes, and the trial velocity grid.
//!
//! Every shape and ordering constraint is checked once at construction so the
//! numeric stages downstream can index without further checks.

use ndarray::Array2;

use crate::error::{VelocityError, ensure_ascending, ensure_len};

/// A common-midpoint gather: samples laid out as (time, offset).
#[derive(Debug, Clone)]
pub struct Gather {
    samples: Array2<f32>,
    offsets: Vec<f32>,
    times: Vec<f32>,
    dt: f32,
}

impl Gather {
    /// Build a gather, failing fast on any shape or axis problem.
    pub fn new(
        samples: Array2<f32>,
        offsets: Vec<f32>,
        times: Vec<f32>,
        dt: f32,
    ) -> Result<Self, VelocityError> {
        if samples.nrows() == 0 {
            return Err(VelocityError::EmptyAxis { axis: "time" });
        }
        if samples.ncols() == 0 {
            return Err(VelocityError::EmptyAxis { axis: "offset" });
        }
        ensure_len("offsets", samples.ncols(), offsets.len())?;
        ensure_len("times", samples.nrows(), times.len())?;
        ensure_ascending("time", &times)?;
        if offsets.iter().any(|offset| !offset.is_finite()) {
            return Err(VelocityError::InvalidParameter {
                name: "offset",
                value: f64::NAN,
                reason: "offsets must be finite",
            });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(VelocityError::InvalidParameter {
                name: "dt",
                value: dt as f64,
                reason: "sample interval must be positive",
            });
        }
        Ok(Self {
            samples,
            offsets,
            times,
            dt,
        })
    }

    pub fn samples(&self) -> &Array2<f32> {
        &self.samples
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn num_times(&self) -> usize {
        self.times.len()
    }

    pub fn num_offsets(&self) -> usize {
        self.offsets.len()
    }

    /// Return a copy of this gather with every amplitude multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            samples: &self.samples * factor,
            offsets: self.offsets.clone(),
            times: self.times.clone(),
            dt: self.dt,
        }
    }
}

/// Strictly ascending, strictly positive trial velocities.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityGrid {
    values: Vec<f32>,
}

impl VelocityGrid {
    pub fn new(values: Vec<f32>) -> Result<Self, VelocityError> {
        ensure_ascending("velocity", &values)?;
        if values[0] <= 0.0 {
            return Err(VelocityError::InvalidParameter {
                name: "velocity",
                value: values[0] as f64,
                reason: "trial velocities must be positive",
            });
        }
        Ok(Self { values })
    }

    /// Evenly spaced grid from `start` to `stop` inclusive.
    pub fn linspace(start: f32, stop: f32, step: f32) -> Result<Self, VelocityError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(VelocityError::InvalidParameter {
                name: "step",
                value: step as f64,
                reason: "grid step must be positive",
            });
        }
        let count = ((stop - start) / step + 1e-3).floor().max(0.0) as usize + 1;
        let values = (0..count).map(|idx| start + step * idx as f32).collect();
        Self::new(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f32 {
        self.values[0]
    }

    pub fn max(&self) -> f32 {
        self.values[self.values.len() - 1]
    }

    /// Index of the grid value closest to `velocity`; ties go to the lower index.
    pub fn nearest_index(&self, velocity: f32) -> usize {
        nearest_index(&self.values, velocity)
    }
}

/// Nearest-neighbour lookup on an ascending axis, first index on ties.
pub(crate) fn nearest_index(axis: &[f32], value: f32) -> usize {
    if axis.is_empty() || value.is_nan() {
        return 0;
    }
    let upper = axis.partition_point(|probe| *probe < value);
    if upper == 0 {
        return 0;
    }
    if upper >= axis.len() {
        return axis.len() - 1;
    }
    let below = value - axis[upper - 1];
    let above = axis[upper] - value;
    if above < below { upper } else { upper - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn rejects_offset_count_mismatch() {
        let samples = Array2::<f32>::zeros((4, 3));
        let err = Gather::new(samples, vec![0.0, 1.0], vec![0.0, 1.0, 2.0, 3.0], 1.0).unwrap_err();
        assert_eq!(
            err,
            VelocityError::ShapeMismatch {
                what: "offsets",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_time_count_mismatch_and_bad_dt() {
        let samples = Array2::<f32>::zeros((4, 2));
        assert!(matches!(
            Gather::new(samples.clone(), vec![0.0, 1.0], vec![0.0, 1.0], 1.0),
            Err(VelocityError::ShapeMismatch { what: "times", .. })
        ));
        assert!(matches!(
            Gather::new(samples, vec![0.0, 1.0], vec![0.0, 1.0, 2.0, 3.0], 0.0),
            Err(VelocityError::InvalidParameter { name: "dt", .. })
        ));
    }

    #[test]
    fn nearest_index_prefers_lower_index_on_ties() {
        let axis = [10.0_f32, 20.0, 30.0];
        assert_eq!(nearest_index(&axis, 15.0), 0);
        assert_eq!(nearest_index(&axis, 16.0), 1);
        assert_eq!(nearest_index(&axis, -5.0), 0);
        assert_eq!(nearest_index(&axis, 99.0), 2);
        assert_eq!(nearest_index(&axis, 30.0), 2);
    }

    #[test]
    fn linspace_includes_stop() {
        let grid = VelocityGrid::linspace(1500.0, 2500.0, 50.0).unwrap();
        assert_eq!(grid.len(), 21);
        assert_eq!(grid.max(), 2500.0);
        assert_eq!(grid.nearest_index(2000.0), 10);
    }

    #[test]
    fn grid_rejects_non_positive_velocities() {
        assert!(VelocityGrid::new(vec![0.0, 1.0]).is_err());
        assert!(VelocityGrid::new(vec![2.0, 1.0]).is_err());
    }
}
