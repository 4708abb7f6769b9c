// src/core/paths.rs

use crate::constants::{CONFIG_DIR_ENV_VAR, CONFIG_DIR_NAME, SETTINGS_FILENAME};
use lazy_static::lazy_static;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

lazy_static! {
    /// The platform config directory, computed on first use.
    static ref SYSTEM_CONFIG_DIR: Option<PathBuf> = dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME));
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
}

/// Returns the nrun configuration directory (`~/.config/nrun` on Linux).
///
/// `NRUN_CONFIG_DIR` takes precedence when set and non-empty. The directory is not
/// created; a missing directory simply means no settings.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    SYSTEM_CONFIG_DIR
        .clone()
        .ok_or(PathError::ConfigDirNotFound)
}

/// Returns the path to the user settings file.
pub fn get_settings_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}
