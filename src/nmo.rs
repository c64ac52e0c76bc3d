//! Normal-moveout correction.
//!
//! For a zero-offset time `t`, offset `o` and velocity `v` the reflection
//! arrives at `sqrt(t² + o²/v²)`. Correction reads the gather at that time,
//! truncated to the sample at or before it; arrivals past the end of the
//! record read as zero.

use ndarray::{Array2, ArrayViewMut1, ArrayViewMut2};

use crate::error::VelocityError;
use crate::gather::Gather;
use crate::interp::{Extrapolation, interpolate};
use crate::path::VelocityModel;

/// Moveout-corrected amplitudes of every offset for one time and velocity.
///
/// `out` must hold exactly `gather.num_offsets()` values; it is overwritten.
pub fn correct_time(gather: &Gather, time: f32, velocity: f32, out: &mut [f32]) {
    debug_assert_eq!(out.len(), gather.num_offsets());
    fill_row(gather, time, velocity, ArrayViewMut1::from(out));
}

fn fill_row(gather: &Gather, time: f32, velocity: f32, mut out: ArrayViewMut1<'_, f32>) {
    let samples = gather.samples();
    let num_times = gather.num_times();
    let dt = gather.dt();
    let slowness_sq = 1.0 / (velocity * velocity);
    let time_sq = time * time;
    for (column, (offset, value)) in gather.offsets().iter().zip(out.iter_mut()).enumerate() {
        let arrival = (time_sq + offset * offset * slowness_sq).sqrt();
        *value = match sample_index(arrival / dt, num_times) {
            Some(row) => samples[[row, column]],
            None => 0.0,
        };
    }
}

/// Fill `out` with the corrected gather for rows `first_row..first_row + out.nrows()`.
pub(crate) fn correct_rows(
    gather: &Gather,
    velocity: f32,
    first_row: usize,
    mut out: ArrayViewMut2<'_, f32>,
) {
    let times = gather.times();
    for (local, row) in out.rows_mut().into_iter().enumerate() {
        fill_row(gather, times[first_row + local], velocity, row);
    }
}

/// Correct the whole gather with a single velocity.
pub fn correct_gather(gather: &Gather, velocity: f32) -> Array2<f32> {
    let mut out = Array2::zeros((gather.num_times(), gather.num_offsets()));
    correct_rows(gather, velocity, 0, out.view_mut());
    out
}

/// Correct the whole gather with the time-varying velocity of a picked model.
pub fn apply_velocity_model(gather: &Gather, model: &VelocityModel) -> Result<Array2<f32>, VelocityError> {
    if model.points().is_empty() {
        return Err(VelocityError::EmptyAxis { axis: "model" });
    }
    let (model_times, model_velocities) = model.control_points();
    let mut out = Array2::zeros((gather.num_times(), gather.num_offsets()));
    for (row, &time) in gather.times().iter().enumerate() {
        let velocity = interpolate(&model_times, &model_velocities, time, Extrapolation::Linear);
        if velocity.is_finite() && velocity > 0.0 {
            fill_row(gather, time, velocity, out.row_mut(row));
        }
    }
    Ok(out)
}

fn sample_index(position: f32, num_times: usize) -> Option<usize> {
    if !position.is_finite() || position < 0.0 {
        return None;
    }
    let index = position as usize;
    (index < num_times).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn ramp_gather(num_times: usize, offsets: Vec<f32>) -> Gather {
        let cols = offsets.len();
        let samples = Array2::from_shape_fn((num_times, cols), |(t, c)| (t * 10 + c) as f32);
        let times = (0..num_times).map(|t| t as f32).collect();
        Gather::new(samples, offsets, times, 1.0).unwrap()
    }

    #[test]
    fn zero_offset_reads_the_same_sample() {
        let gather = ramp_gather(8, vec![0.0]);
        let mut out = [0.0_f32; 1];
        correct_time(&gather, 3.0, 1234.0, &mut out);
        assert_eq!(out[0], 30.0);
    }

    #[test]
    fn offset_shifts_to_hyperbolic_arrival() {
        // sqrt(3² + 4²/1²) = 5
        let gather = ramp_gather(8, vec![0.0, 4.0]);
        let mut out = [0.0_f32; 2];
        correct_time(&gather, 3.0, 1.0, &mut out);
        assert_eq!(out, [30.0, 51.0]);
    }

    #[test]
    fn arrival_past_record_end_is_zero() {
        let gather = ramp_gather(4, vec![0.0, 10.0]);
        let mut out = [-1.0_f32; 2];
        correct_time(&gather, 2.0, 1.0, &mut out);
        assert_eq!(out, [20.0, 0.0]);
    }

    #[test]
    fn arrival_truncates_to_earlier_sample() {
        // sqrt(1 + 4) = 2.236 -> 2, sqrt(4 + 4) = 2.83 -> 2, sqrt(9 + 4) = 3.61 -> 3
        let gather = ramp_gather(6, vec![2.0]);
        let mut out = [0.0_f32; 1];
        correct_time(&gather, 1.0, 1.0, &mut out);
        assert_eq!(out[0], 20.0);
        correct_time(&gather, 2.0, 1.0, &mut out);
        assert_eq!(out[0], 20.0);
        correct_time(&gather, 3.0, 1.0, &mut out);
        assert_eq!(out[0], 30.0);
    }

    #[test]
    fn whole_gather_correction_matches_rows() {
        let gather = ramp_gather(6, vec![0.0, 1.0, 2.0]);
        let corrected = correct_gather(&gather, 2.0);
        let mut row = [0.0_f32; 3];
        for t in 0..6 {
            correct_time(&gather, t as f32, 2.0, &mut row);
            assert_eq!(corrected.row(t).to_vec(), row.to_vec());
        }
    }

    #[test]
    fn model_correction_uses_interpolated_velocity() {
        let gather = ramp_gather(8, vec![0.0, 4.0]);
        let model = VelocityModel::from_points(vec![(0.0, 1.0), (7.0, 1.0)], 0.0);
        let corrected = apply_velocity_model(&gather, &model).unwrap();
        assert_eq!(corrected.row(3).to_vec(), vec![30.0, 51.0]);
    }
}
