//! Configuration for the bootstrap workflow.
//!
//! `BotConfig` is assembled by [`ConfigLoader`] from built-in defaults, the global
//! and workspace config files, and `OGSBOT_*` environment variables.

pub mod artifacts;
pub mod facade;
pub mod merge;
pub mod paths;
pub mod sections;
pub mod sources;
pub mod workspace;

pub use artifacts::{ArtifactSpec, ArtifactsConfig};
pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use sections::{EngineSection, HttpConfig, LaunchConfig, LibrariesConfig, MonitorConfig};
pub use workspace::layout::InstallLayout;

use crate::error::SetupError;
use crate::integrity::Checksum;
use crate::logging::LoggingConfig;
use crate::policy::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Directory everything is installed into (default: current directory)
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub libraries: LibrariesConfig,

    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub launch: LaunchConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            artifacts: ArtifactsConfig::default(),
            libraries: LibrariesConfig::default(),
            engine: EngineSection::default(),
            policy: PolicyConfig::default(),
            launch: LaunchConfig::default(),
            monitor: MonitorConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BotConfig {
    /// Check the parts of the config that would otherwise fail midway through a run.
    ///
    /// Checksums are parsed here so a typo is reported before anything is downloaded.
    pub fn validate(&self) -> Result<(), SetupError> {
        for artifact in self.artifacts.all() {
            if artifact.url.trim().is_empty() {
                return Err(SetupError::Config(format!(
                    "Artifact '{}' has an empty URL",
                    artifact.file_name
                )));
            }
            if artifact.file_name.contains('/') || artifact.file_name.is_empty() {
                return Err(SetupError::Config(format!(
                    "Artifact file name must be a bare file name: '{}'",
                    artifact.file_name
                )));
            }
            if let Some(checksum) = &artifact.checksum {
                Checksum::parse(checksum)?;
            }
        }
        if self.libraries.extractor.is_empty() {
            return Err(SetupError::Config(
                "libraries.extractor must name a command".to_string(),
            ));
        }
        if self.libraries.search_dirs.is_empty() {
            return Err(SetupError::Config(
                "libraries.search_dirs must list at least one directory".to_string(),
            ));
        }
        if self.monitor.interval_ms == 0 {
            return Err(SetupError::Config(
                "monitor.interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The API key, or a config error naming where it can be set.
    pub fn api_key(&self) -> Result<&str, SetupError> {
        match self.launch.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(SetupError::Config(
                "No API key configured (set launch.api_key, OGSBOT_LAUNCH__API_KEY or --apikey)"
                    .to_string(),
            )),
        }
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout::resolve(self)
    }
}
