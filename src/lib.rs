//! Semblance-based seismic velocity picking.
//!
//! Given a common-midpoint gather, [`semblance::calc_semblance`] scores every
//! trial velocity at every time sample, [`peaks::find_local_maximas`] extracts
//! candidate picks and [`path::calc_velocity_model`] chooses the monotonic
//! chain of picks with the highest mean semblance. [`picker::VelocityPicker`]
//! runs the whole chain with one configuration.

/// Directory helpers for config and logs.
pub mod app_dirs;
/// Velocity corridors for bounded semblance.
pub mod bounds;
/// TOML-backed settings.
pub mod config;
/// Error type shared by the numeric stages.
pub mod error;
/// Validated gather and velocity-axis inputs.
pub mod gather;
/// Piecewise-linear curve evaluation.
pub mod interp;
/// Logging setup for the command-line tool.
pub mod logging;
/// Normal-moveout correction.
pub mod nmo;
/// Monotonic path search over semblance peaks.
pub mod path;
/// Local-maximum detection.
pub mod peaks;
/// Full pipeline for a single gather.
pub mod picker;
/// Semblance panels.
pub mod semblance;
/// Synthetic gathers with known velocity.
pub mod synthetic;

pub use bounds::{ReferenceCurve, VelocityBounds, calc_bounds};
pub use error::VelocityError;
pub use gather::{Gather, VelocityGrid};
pub use path::{ModelPoint, PathSearch, VelocityModel, calc_trace_metric, calc_velocity_model};
pub use peaks::{Pick, find_local_maximas};
pub use picker::{VelocityAnalysis, VelocityPicker};
pub use semblance::{SemblancePanel, calc_partial_semblance, calc_semblance};
