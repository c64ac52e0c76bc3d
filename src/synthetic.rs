//! Synthetic common-midpoint gathers with known moveout velocity.
//!
//! A dense train of Ricker wavelets at seeded random zero-offset times is
//! mapped onto each offset along the exact reflection hyperbola.

use std::f32::consts::PI;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::VelocityError;
use crate::gather::Gather;

/// Fixed-point iterations used to invert moveout under a velocity gradient.
const MOVEOUT_ITERATIONS: usize = 24;
/// Wavelets further than this many periods from a sample are skipped.
const WAVELET_SUPPORT_PERIODS: f32 = 1.5;

/// Layout and physics of a synthetic gather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticGatherConfig {
    #[serde(default = "default_num_times")]
    pub num_times: usize,
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default = "default_offsets")]
    pub offsets: Vec<f32>,
    /// Moveout velocity at zero time.
    #[serde(default = "default_velocity")]
    pub velocity: f32,
    /// Velocity increase per unit of zero-offset time.
    #[serde(default)]
    pub velocity_gradient: f32,
    /// Ricker peak frequency.
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    /// Mean spacing between reflection events.
    #[serde(default = "default_event_spacing")]
    pub event_spacing: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SyntheticGatherConfig {
    fn default() -> Self {
        Self {
            num_times: default_num_times(),
            dt: default_dt(),
            offsets: default_offsets(),
            velocity: default_velocity(),
            velocity_gradient: 0.0,
            frequency: default_frequency(),
            event_spacing: default_event_spacing(),
            seed: default_seed(),
        }
    }
}

impl SyntheticGatherConfig {
    pub fn validate(&self) -> Result<(), VelocityError> {
        if self.num_times == 0 {
            return Err(VelocityError::EmptyAxis { axis: "time" });
        }
        if self.offsets.is_empty() {
            return Err(VelocityError::EmptyAxis { axis: "offset" });
        }
        for (name, value) in [
            ("dt", self.dt),
            ("velocity", self.velocity),
            ("frequency", self.frequency),
            ("event_spacing", self.event_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(VelocityError::InvalidParameter {
                    name,
                    value: value as f64,
                    reason: "must be positive",
                });
            }
        }
        Ok(())
    }

    /// True moveout velocity for a zero-offset time.
    pub fn velocity_at(&self, zero_offset_time: f32) -> f32 {
        self.velocity + self.velocity_gradient * zero_offset_time
    }

    pub fn times(&self) -> Vec<f32> {
        (0..self.num_times).map(|idx| idx as f32 * self.dt).collect()
    }
}

fn default_num_times() -> usize {
    200
}

fn default_dt() -> f32 {
    0.004
}

fn default_offsets() -> Vec<f32> {
    vec![0.0, 500.0, 1000.0, 1500.0]
}

fn default_velocity() -> f32 {
    2000.0
}

fn default_frequency() -> f32 {
    20.0
}

fn default_event_spacing() -> f32 {
    0.02
}

fn default_seed() -> u64 {
    7
}

/// A reflection event on the zero-offset trace.
#[derive(Debug, Clone, Copy)]
struct Event {
    time: f32,
    amplitude: f32,
}

/// Build a gather whose events follow the configured moveout exactly.
pub fn synthetic_gather(config: &SyntheticGatherConfig) -> Result<Gather, VelocityError> {
    config.validate()?;
    let events = random_events(config);
    let times = config.times();
    let support = WAVELET_SUPPORT_PERIODS / config.frequency;
    let samples = Array2::from_shape_fn((config.num_times, config.offsets.len()), |(row, column)| {
        match zero_offset_time(config, times[row], config.offsets[column]) {
            Some(t0) => zero_offset_amplitude(&events, t0, config.frequency, support),
            None => 0.0,
        }
    });
    Gather::new(samples, config.offsets.clone(), times, config.dt)
}

/// Ricker wavelet with peak frequency `frequency`, centred on zero.
pub fn ricker(time: f32, frequency: f32) -> f32 {
    let arg = (PI * frequency * time).powi(2);
    (1.0 - 2.0 * arg) * (-arg).exp()
}

fn random_events(config: &SyntheticGatherConfig) -> Vec<Event> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let duration = config.num_times as f32 * config.dt;
    let mut events = Vec::new();
    let mut time = 0.0_f32;
    while time < duration + config.event_spacing {
        let jitter = (rng.random::<f32>() - 0.5) * config.event_spacing;
        let magnitude = 0.5 + 0.5 * rng.random::<f32>();
        let sign = if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
        events.push(Event {
            time: time + jitter,
            amplitude: sign * magnitude,
        });
        time += config.event_spacing;
    }
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    events
}

fn zero_offset_amplitude(events: &[Event], t0: f32, frequency: f32, support: f32) -> f32 {
    let start = events.partition_point(|event| event.time < t0 - support);
    events[start..]
        .iter()
        .take_while(|event| event.time <= t0 + support)
        .map(|event| event.amplitude * ricker(t0 - event.time, frequency))
        .sum()
}

/// Zero-offset time whose reflection arrives at `time` on `offset`.
fn zero_offset_time(config: &SyntheticGatherConfig, time: f32, offset: f32) -> Option<f32> {
    let mut t0 = time;
    for _ in 0..MOVEOUT_ITERATIONS {
        let velocity = config.velocity_at(t0);
        let moveout = offset / velocity;
        let remaining = time * time - moveout * moveout;
        if remaining < 0.0 {
            return None;
        }
        t0 = remaining.sqrt();
    }
    Some(t0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_reference_survey() {
        let gather = synthetic_gather(&SyntheticGatherConfig::default()).unwrap();
        assert_eq!(gather.num_times(), 200);
        assert_eq!(gather.offsets(), &[0.0, 500.0, 1000.0, 1500.0]);
        assert!((gather.dt() - 0.004).abs() < 1e-9);
    }

    #[test]
    fn same_seed_gives_same_gather() {
        let config = SyntheticGatherConfig::default();
        let first = synthetic_gather(&config).unwrap();
        let second = synthetic_gather(&config).unwrap();
        assert_eq!(first.samples(), second.samples());
    }

    #[test]
    fn far_offsets_are_silent_before_direct_moveout() {
        let config = SyntheticGatherConfig::default();
        let gather = synthetic_gather(&config).unwrap();
        // 1500 / 2000 = 0.75 s, sample 187
        for row in 0..187 {
            assert_eq!(gather.samples()[[row, 3]], 0.0);
        }
    }

    #[test]
    fn zero_offset_time_inverts_constant_moveout() {
        let config = SyntheticGatherConfig::default();
        let t0 = zero_offset_time(&config, 0.5, 600.0).unwrap();
        assert!((t0 - 0.4).abs() < 1e-5);
    }

    #[test]
    fn ricker_peaks_at_zero() {
        assert!((ricker(0.0, 25.0) - 1.0).abs() < 1e-6);
        assert!(ricker(0.02, 25.0) < 0.0);
    }

    #[test]
    fn rejects_non_positive_frequency() {
        let config = SyntheticGatherConfig {
            frequency: 0.0,
            ..SyntheticGatherConfig::default()
        };
        assert!(synthetic_gather(&config).is_err());
    }
}
