//! Local-maximum picking on a semblance panel.

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{VelocityError, ensure_len};
use crate::gather::VelocityGrid;
use crate::semblance::SemblancePanel;

/// Slack allowed when comparing a cell against its neighbourhood maximum.
pub const DEFAULT_PEAK_TOLERANCE: f32 = 1e-6;

/// A local maximum of the semblance panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub time: f32,
    pub velocity: f32,
    pub time_index: usize,
    pub velocity_index: usize,
    pub semblance: f32,
}

/// Cells that equal the maximum of their neighbourhood, in row-major order.
///
/// The neighbourhood spans `area_factor` of the panel along each axis (at
/// least one cell). Cells with no positive coherence are never picked, even
/// when they equal their neighbourhood maximum: silent windows and the
/// unevaluated cells of a bounded panel yield no picks, and an all-zero panel
/// yields none at all.
pub fn find_local_maximas(
    panel: &SemblancePanel,
    times: &[f32],
    velocities: &VelocityGrid,
    area_factor: f32,
    tolerance: f32,
) -> Result<Vec<Pick>, VelocityError> {
    validate_area_factor(area_factor)?;
    ensure_len("panel time rows", times.len(), panel.num_times())?;
    ensure_len("panel velocity columns", velocities.len(), panel.num_velocities())?;
    let values = panel.values();
    let size = (
        neighbourhood_size(area_factor, panel.num_times()),
        neighbourhood_size(area_factor, panel.num_velocities()),
    );
    let filtered = maximum_filter(values, size);
    let mut picks = Vec::new();
    for ((time_index, velocity_index), &value) in values.indexed_iter() {
        if value > 0.0 && value >= filtered[[time_index, velocity_index]] - tolerance {
            picks.push(Pick {
                time: times[time_index],
                velocity: velocities.values()[velocity_index],
                time_index,
                velocity_index,
                semblance: value,
            });
        }
    }
    Ok(picks)
}

pub(crate) fn validate_area_factor(area_factor: f32) -> Result<(), VelocityError> {
    if !area_factor.is_finite() || area_factor <= 0.0 {
        return Err(VelocityError::InvalidParameter {
            name: "area_factor",
            value: area_factor as f64,
            reason: "area factor must be positive",
        });
    }
    Ok(())
}

fn neighbourhood_size(area_factor: f32, len: usize) -> usize {
    ((area_factor * len as f32) as usize).max(1)
}

/// Separable maximum filter; windows are clipped at the panel edges.
fn maximum_filter(values: &Array2<f32>, (rows, cols): (usize, usize)) -> Array2<f32> {
    let mut along_velocity = values.clone();
    for (source, target) in values
        .axis_iter(Axis(0))
        .zip(along_velocity.axis_iter_mut(Axis(0)))
    {
        max_filter_line(source, target, cols);
    }
    let mut filtered = along_velocity.clone();
    for (source, target) in along_velocity
        .axis_iter(Axis(1))
        .zip(filtered.axis_iter_mut(Axis(1)))
    {
        max_filter_line(source, target, rows);
    }
    filtered
}

fn max_filter_line(source: ArrayView1<'_, f32>, mut target: ArrayViewMut1<'_, f32>, size: usize) {
    let len = source.len();
    let half = size / 2;
    for (idx, cell) in target.iter_mut().enumerate() {
        let lo = idx.saturating_sub(half);
        let hi = (idx + size - 1).saturating_sub(half).min(len - 1);
        let mut best = f32::NEG_INFINITY;
        for probe in lo..=hi {
            best = best.max(source[probe]);
        }
        *cell = best;
    }
}
