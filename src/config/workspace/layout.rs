//! InstallLayout: every path the workflow reads or writes.

use crate::config::BotConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Resolved filesystem layout for one workspace.
///
/// All paths are joined onto the workspace root, so a relative workspace yields
/// relative paths and the launched process must run from that root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallLayout {
    pub workspace: PathBuf,
    pub lib_dir: PathBuf,
    pub library_search_dirs: Vec<PathBuf>,
    pub engine_dir: PathBuf,
    pub engine_binary: PathBuf,
    pub engine_config: PathBuf,
    pub model_file: PathBuf,
    pub bridge_binary: PathBuf,
    pub policy_file: PathBuf,
}

impl InstallLayout {
    pub fn resolve(config: &BotConfig) -> Self {
        let workspace = config.workspace.clone();
        let lib_dir = workspace.join(&config.libraries.dir);
        let library_search_dirs = config
            .libraries
            .search_dirs
            .iter()
            .map(|dir| lib_dir.join(dir))
            .collect();
        let engine_dir = workspace.join(&config.engine.dir);

        Self {
            library_search_dirs,
            engine_binary: engine_dir.join(&config.engine.binary),
            engine_config: engine_dir.join(&config.engine.config_file),
            model_file: engine_dir.join(&config.engine.model_file),
            bridge_binary: workspace.join(&config.artifacts.bridge.file_name),
            policy_file: workspace.join(&config.launch.policy_file),
            lib_dir,
            engine_dir,
            workspace,
        }
    }

    /// Where a download is staged before it is unpacked or moved into place.
    pub fn staging_path(&self, file_name: &str) -> PathBuf {
        self.workspace.join(file_name)
    }

    /// Path of `path` relative to the workspace, for display.
    pub fn display_relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.workspace).unwrap_or(path)
    }
}
