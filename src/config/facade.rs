//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::BotConfig;
use crate::error::SetupError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(workspace_root: &Path) -> Result<BotConfig, SetupError> {
        Ok(MergeService::load(workspace_root)?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<BotConfig, SetupError> {
        Ok(MergeService::load_from_file(path)?)
    }

    /// Load from `config_path` when given, otherwise from the workspace sources.
    ///
    /// An explicit workspace always wins over the one recorded in a file.
    pub fn load_for(
        workspace_root: &Path,
        config_path: Option<&Path>,
    ) -> Result<BotConfig, SetupError> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load(workspace_root)?,
        };
        if workspace_root != Path::new(".") {
            config.workspace = workspace_root.to_path_buf();
        }
        config.validate()?;
        Ok(config)
    }
}
