//! XDG Base Directory lookups for the global config file.

use crate::error::SetupError;
use std::path::PathBuf;

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, SetupError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        SetupError::Config(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// Global config file: `$XDG_CONFIG_HOME/ogsbot/config.toml`
///
/// The file is optional; callers must tolerate it not existing.
pub fn global_config_path() -> Result<PathBuf, SetupError> {
    Ok(config_home()?.join("ogsbot").join("config.toml"))
}
