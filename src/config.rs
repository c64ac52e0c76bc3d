//! Picker settings persisted as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::error::VelocityError;
use crate::path::PathSearch;
use crate::peaks::{DEFAULT_PEAK_TOLERANCE, validate_area_factor};
use crate::synthetic::SyntheticGatherConfig;

/// Default filename used to store picker settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to resolve the configuration directory.
    #[error(transparent)]
    Dirs(#[from] app_dirs::AppDirError),
    /// Failed to read the configuration file.
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid TOML for the expected layout.
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Values parsed but are out of range.
    #[error("Invalid config value: {0}")]
    Invalid(#[from] VelocityError),
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub synthetic: SyntheticGatherConfig,
}

/// Parameters of the semblance and picking stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Half-width in samples of the energy aggregation window.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Peak neighbourhood as a fraction of each panel axis.
    #[serde(default = "default_area_factor")]
    pub area_factor: f32,
    /// Slack when comparing a cell with its neighbourhood maximum.
    #[serde(default = "default_peak_tolerance")]
    pub peak_tolerance: f32,
    /// Corridor half-width, as a fraction of the reference velocity, in bounded mode.
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
    /// Stop the path search after scoring this many paths.
    #[serde(default)]
    pub max_paths: Option<usize>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            area_factor: default_area_factor(),
            peak_tolerance: default_peak_tolerance(),
            tolerance: default_tolerance(),
            max_paths: None,
        }
    }
}

impl PickerConfig {
    pub fn validate(&self) -> Result<(), VelocityError> {
        validate_area_factor(self.area_factor)?;
        if !self.peak_tolerance.is_finite() || self.peak_tolerance < 0.0 {
            return Err(VelocityError::InvalidParameter {
                name: "peak_tolerance",
                value: self.peak_tolerance as f64,
                reason: "peak tolerance must be non-negative",
            });
        }
        if !self.tolerance.is_finite() || !(0.0..1.0).contains(&self.tolerance) {
            return Err(VelocityError::InvalidParameter {
                name: "tolerance",
                value: self.tolerance as f64,
                reason: "tolerance must lie in [0, 1)",
            });
        }
        if self.max_paths == Some(0) {
            return Err(VelocityError::InvalidParameter {
                name: "max_paths",
                value: 0.0,
                reason: "path budget must allow at least one path",
            });
        }
        Ok(())
    }

    pub fn path_search(&self) -> PathSearch {
        PathSearch {
            area_factor: self.area_factor,
            peak_tolerance: self.peak_tolerance,
            max_paths: self.max_paths,
        }
    }
}

fn default_window() -> usize {
    4
}

fn default_area_factor() -> f32 {
    0.1
}

fn default_peak_tolerance() -> f32 {
    DEFAULT_PEAK_TOLERANCE
}

fn default_tolerance() -> f32 {
    0.1
}

/// Resolve the default configuration file path.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from the default location, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_from_path(&path)
}

/// Load and validate configuration from `path`.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.picker.validate()?;
    config.synthetic.validate()?;
    Ok(config)
}
