//! Where mlscope keeps its files.
//!
//! Everything lives in one `.mlscope` folder under the OS config directory
//! (`~/.config` on Linux, `%APPDATA%` on Windows). Setting
//! `MLSCOPE_CONFIG_HOME` moves that base, which the integration tests rely on.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

/// Folder created under the base config directory.
pub const APP_DIR_NAME: &str = ".mlscope";
/// Environment variable that replaces the OS config directory as the base.
pub const CONFIG_HOME_ENV: &str = "MLSCOPE_CONFIG_HOME";

const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No config directory found; set MLSCOPE_CONFIG_HOME to choose one")]
    NoBaseDir,
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolved `.mlscope` root. Subdirectories are created on first access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppDirs {
    root: PathBuf,
}

impl AppDirs {
    /// Resolve from `MLSCOPE_CONFIG_HOME`, then the OS config directory.
    pub fn resolve() -> Result<Self, AppDirError> {
        let base = base_dir(std::env::var_os(CONFIG_HOME_ENV)).ok_or(AppDirError::NoBaseDir)?;
        Ok(Self::under(&base))
    }

    /// Root placed directly under `base`, without touching the environment.
    pub fn under(base: &Path) -> Self {
        Self {
            root: base.join(APP_DIR_NAME),
        }
    }

    pub fn root(&self) -> Result<PathBuf, AppDirError> {
        create(self.root.clone())
    }

    pub fn logs(&self) -> Result<PathBuf, AppDirError> {
        create(self.root.join(LOGS_DIR_NAME))
    }
}

/// An empty override counts as unset.
fn base_dir(override_home: Option<OsString>) -> Option<PathBuf> {
    match override_home {
        Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
        _ => BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()),
    }
}

fn create(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
