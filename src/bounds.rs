//! Velocity corridors around a reference curve for bounded semblance.

use serde::{Deserialize, Serialize};

use crate::error::{VelocityError, ensure_ascending, ensure_len};
use crate::gather::VelocityGrid;
use crate::interp::{Extrapolation, interpolate_all};

/// Caller-supplied (time, velocity) control points, ascending in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    points: Vec<(f32, f32)>,
}

impl ReferenceCurve {
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self, VelocityError> {
        let times: Vec<f32> = points.iter().map(|(time, _)| *time).collect();
        ensure_ascending("reference time", &times)?;
        if let Some((_, velocity)) = points
            .iter()
            .find(|(_, velocity)| !(velocity.is_finite() && *velocity > 0.0))
        {
            return Err(VelocityError::InvalidParameter {
                name: "reference velocity",
                value: *velocity as f64,
                reason: "reference velocities must be positive",
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Reference velocity at each of `times`, holding the end values outside the curve.
    pub fn sample(&self, times: &[f32]) -> Vec<f32> {
        let (xs, ys): (Vec<f32>, Vec<f32>) = self.points.iter().copied().unzip();
        interpolate_all(&xs, &ys, times, Extrapolation::Clamp)
    }

    /// Corridor of `tolerance` around this curve on the given axes.
    pub fn bounds(
        &self,
        times: &[f32],
        velocities: &VelocityGrid,
        tolerance: f32,
    ) -> Result<VelocityBounds, VelocityError> {
        calc_bounds(&self.sample(times), velocities, tolerance)
    }
}

/// Per-time inclusive range of velocity indices worth evaluating.
///
/// `lower[t] > upper[t]` is allowed and means an empty corridor at `t`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VelocityBounds {
    lower: Vec<usize>,
    upper: Vec<usize>,
}

impl VelocityBounds {
    pub fn new(lower: Vec<usize>, upper: Vec<usize>) -> Result<Self, VelocityError> {
        ensure_len("upper bounds", lower.len(), upper.len())?;
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> &[usize] {
        &self.lower
    }

    pub fn upper(&self) -> &[usize] {
        &self.upper
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn contains(&self, time_index: usize, velocity_index: usize) -> bool {
        match (self.lower.get(time_index), self.upper.get(time_index)) {
            (Some(&lower), Some(&upper)) => lower <= velocity_index && velocity_index <= upper,
            _ => false,
        }
    }

    /// `min(lower) ..= max(upper)`, or `None` when that range is empty.
    pub fn velocity_index_range(&self) -> Option<(usize, usize)> {
        let first = self.lower.iter().copied().min()?;
        let last = self.upper.iter().copied().max()?;
        (first <= last).then_some((first, last))
    }
}

/// Nearest grid indices to `reference * (1 ∓ tolerance)` at every time sample.
///
/// The reference is first clipped into the grid's velocity range.
pub fn calc_bounds(
    reference: &[f32],
    velocities: &VelocityGrid,
    tolerance: f32,
) -> Result<VelocityBounds, VelocityError> {
    if !tolerance.is_finite() || !(0.0..1.0).contains(&tolerance) {
        return Err(VelocityError::InvalidParameter {
            name: "tolerance",
            value: tolerance as f64,
            reason: "tolerance must lie in [0, 1)",
        });
    }
    let (min, max) = (velocities.min(), velocities.max());
    let mut lower = Vec::with_capacity(reference.len());
    let mut upper = Vec::with_capacity(reference.len());
    for &velocity in reference {
        let clipped = if velocity.is_nan() { min } else { velocity.clamp(min, max) };
        lower.push(velocities.nearest_index(clipped * (1.0 - tolerance)));
        upper.push(velocities.nearest_index(clipped * (1.0 + tolerance)));
    }
    VelocityBounds::new(lower, upper)
}
