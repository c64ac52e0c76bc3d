//! Monotonic velocity-path search over semblance peaks.
//!
//! Starting from the seed `(min(times), min(velocities))`, every chain of
//! picks with strictly increasing time and velocity is enumerated depth-first.
//! Chains that cannot be extended are scored by the mean semblance along
//! their interpolated velocity curve; the best chain is the velocity model.
//! The seed stays the first point of the reported model, so the reported
//! points are exactly the control points that were scored.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VelocityError, ensure_ascending, ensure_len};
use crate::gather::VelocityGrid;
use crate::interp::{Extrapolation, interpolate, interpolate_all};
use crate::peaks::{DEFAULT_PEAK_TOLERANCE, Pick, find_local_maximas, validate_area_factor};
use crate::semblance::SemblancePanel;

/// One control point of a velocity model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPoint {
    pub time: f32,
    pub velocity: f32,
}

/// Picked velocity-versus-time curve and the mean semblance along it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityModel {
    points: Vec<ModelPoint>,
    score: f32,
}

impl VelocityModel {
    pub fn from_points(points: Vec<(f32, f32)>, score: f32) -> Self {
        Self {
            points: points
                .into_iter()
                .map(|(time, velocity)| ModelPoint { time, velocity })
                .collect(),
            score,
        }
    }

    pub fn points(&self) -> &[ModelPoint] {
        &self.points
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// Control times and velocities as separate vectors.
    pub fn control_points(&self) -> (Vec<f32>, Vec<f32>) {
        self.points
            .iter()
            .map(|point| (point.time, point.velocity))
            .unzip()
    }

    /// Model velocity at `time`, extending the end segments linearly.
    pub fn velocity_at(&self, time: f32) -> f32 {
        let (times, velocities) = self.control_points();
        interpolate(&times, &velocities, time, Extrapolation::Linear)
    }

    pub fn velocities_at(&self, times: &[f32]) -> Vec<f32> {
        let (control_times, control_velocities) = self.control_points();
        interpolate_all(&control_times, &control_velocities, times, Extrapolation::Linear)
    }
}

/// Parameters of the path search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSearch {
    pub area_factor: f32,
    pub peak_tolerance: f32,
    /// Upper bound on scored terminal paths; `None` searches exhaustively.
    pub max_paths: Option<usize>,
}

impl Default for PathSearch {
    fn default() -> Self {
        Self {
            area_factor: 0.1,
            peak_tolerance: DEFAULT_PEAK_TOLERANCE,
            max_paths: None,
        }
    }
}

impl PathSearch {
    pub fn new(area_factor: f32) -> Self {
        Self {
            area_factor,
            ..Self::default()
        }
    }

    /// Detect peaks on `panel` and search them for the best velocity model.
    pub fn run(
        &self,
        panel: &SemblancePanel,
        times: &[f32],
        velocities: &VelocityGrid,
    ) -> Result<VelocityModel, VelocityError> {
        validate_area_factor(self.area_factor)?;
        let picks = find_local_maximas(panel, times, velocities, self.area_factor, self.peak_tolerance)?;
        self.search(panel, times, velocities, &picks)
    }

    /// Search an already detected set of picks.
    pub fn search(
        &self,
        panel: &SemblancePanel,
        times: &[f32],
        velocities: &VelocityGrid,
        picks: &[Pick],
    ) -> Result<VelocityModel, VelocityError> {
        ensure_len("panel time rows", times.len(), panel.num_times())?;
        ensure_len("panel velocity columns", velocities.len(), panel.num_velocities())?;
        ensure_ascending("time", times)?;
        let seed = ModelPoint {
            time: times[0],
            velocity: velocities.min(),
        };

        let mut best: Option<(Vec<usize>, f32)> = None;
        let mut scored = 0usize;
        let mut stack: Vec<Vec<usize>> = vec![Vec::new()];
        let mut points = Vec::with_capacity(picks.len() + 1);
        while let Some(prefix) = stack.pop() {
            let last = prefix
                .last()
                .map(|&idx| point_of(&picks[idx]))
                .unwrap_or(seed);
            let extensions: Vec<usize> = picks
                .iter()
                .enumerate()
                .filter(|(_, pick)| pick.time > last.time && pick.velocity > last.velocity)
                .map(|(idx, _)| idx)
                .collect();
            if extensions.is_empty() {
                scored += 1;
                if let Some(limit) = self.max_paths
                    && scored > limit
                {
                    return Err(VelocityError::SearchBudgetExceeded { limit });
                }
                points.clear();
                points.push(seed);
                points.extend(prefix.iter().map(|&idx| point_of(&picks[idx])));
                let score = calc_trace_metric(panel, times, velocities, &points);
                if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
                    best = Some((prefix, score));
                }
                continue;
            }
            for &idx in extensions.iter().rev() {
                let mut next = Vec::with_capacity(prefix.len() + 1);
                next.extend_from_slice(&prefix);
                next.push(idx);
                stack.push(next);
            }
        }

        let (path, score) = best.unwrap_or_default();
        debug!(
            candidates = picks.len(),
            scored,
            path_len = path.len() + 1,
            score,
            "Velocity path search finished"
        );
        let mut model_points = Vec::with_capacity(path.len() + 1);
        model_points.push(seed);
        model_points.extend(path.iter().map(|&idx| point_of(&picks[idx])));
        Ok(VelocityModel {
            points: model_points,
            score,
        })
    }
}

/// Best monotonic velocity model through the peaks of `panel`.
pub fn calc_velocity_model(
    panel: &SemblancePanel,
    times: &[f32],
    velocities: &VelocityGrid,
    area_factor: f32,
) -> Result<VelocityModel, VelocityError> {
    PathSearch::new(area_factor).run(panel, times, velocities)
}

/// Mean panel value along the curve through `points`, one sample per time row.
///
/// The curve extends its end segments beyond the control points; at each
/// time the nearest grid velocity is looked up.
pub fn calc_trace_metric(
    panel: &SemblancePanel,
    times: &[f32],
    velocities: &VelocityGrid,
    points: &[ModelPoint],
) -> f32 {
    if points.is_empty() || times.is_empty() {
        return 0.0;
    }
    let (control_times, control_velocities): (Vec<f32>, Vec<f32>) = points
        .iter()
        .map(|point| (point.time, point.velocity))
        .unzip();
    let values = panel.values();
    let mut sum = 0.0_f64;
    for (time_index, &time) in times.iter().enumerate() {
        let velocity = interpolate(&control_times, &control_velocities, time, Extrapolation::Linear);
        let velocity_index = velocities.nearest_index(velocity);
        sum += values[[time_index, velocity_index]] as f64;
    }
    (sum / times.len() as f64) as f32
}

fn point_of(pick: &Pick) -> ModelPoint {
    ModelPoint {
        time: pick.time,
        velocity: pick.velocity,
    }
}
