//! Directory helpers anchored to a single `.velpick` folder.
//!
//! Config and log files for the command-line tool live under the OS config
//! directory unless `VELPICK_CONFIG_HOME` points somewhere else.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

/// Name of the tool directory under the config root.
pub const APP_DIR_NAME: &str = ".velpick";
/// Environment variable overriding the config root.
pub const CONFIG_HOME_ENV: &str = "VELPICK_CONFIG_HOME";

/// Errors raised while resolving or preparing the tool's directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No base config directory could be resolved.
    #[error("No base config directory available for velpick files")]
    NoBaseDir,
    /// Failed to create a directory.
    #[error("Failed to create directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Return the `.velpick` directory, creating it if needed.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
    root_dir_under(&base)
}

/// Return the `logs` directory inside the `.velpick` root, creating it if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    let root = app_root_dir()?;
    ensure_dir(root.join("logs"))
}

pub(crate) fn root_dir_under(base: &Path) -> Result<PathBuf, AppDirError> {
    ensure_dir(base.join(APP_DIR_NAME))
}

pub(crate) fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn config_base_dir() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_HOME_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn root_is_created_under_base() {
        let base = tempdir().unwrap();
        let root = root_dir_under(base.path()).unwrap();
        assert_eq!(root, base.path().join(APP_DIR_NAME));
        assert!(root.is_dir());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let base = tempdir().unwrap();
        let nested = base.path().join("a").join("b");
        ensure_dir(nested.clone()).unwrap();
        assert_eq!(ensure_dir(nested.clone()).unwrap(), nested);
    }
}
