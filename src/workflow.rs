//! Bootstrap workflow: install, patch, write the policy, launch.
//!
//! Steps run strictly in order on the calling thread and the first failure
//! aborts the run, so the bridge is never started against a half-installed
//! workspace. Every run re-downloads and overwrites all artifacts.

use crate::config::{BotConfig, InstallLayout};
use crate::engine_config::{self, PatchReport};
use crate::error::SetupError;
use crate::fetch::ArtifactSource;
use crate::install::{self, LibrarySearchPath};
use crate::launch::{self, LaunchPlan};
use crate::monitor::{CpuMonitor, ProcStatSampler};
use crate::policy::BotPolicy;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{error, info};
use walkdir::WalkDir;

/// What `install` produced.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub library_path: LibrarySearchPath,
    pub model_bytes: u64,
    pub patch: PatchReport,
    pub policy_file: PathBuf,
}

pub struct Workflow<'a> {
    config: BotConfig,
    layout: InstallLayout,
    source: &'a dyn ArtifactSource,
}

impl<'a> Workflow<'a> {
    /// Create the workspace if needed and resolve it to an absolute path.
    pub fn new(mut config: BotConfig, source: &'a dyn ArtifactSource) -> Result<Self, SetupError> {
        std::fs::create_dir_all(&config.workspace)?;
        config.workspace = config.workspace.canonicalize()?;
        let layout = config.layout();
        Ok(Self {
            config,
            layout,
            source,
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Steps 1 to 6: everything except the launch.
    pub fn install(&self) -> Result<InstallReport, SetupError> {
        let artifacts = &self.config.artifacts;

        let library_path = step(1, "libraries", || {
            install::install_libraries(
                self.source,
                &artifacts.libraries,
                &self.config.libraries,
                &self.layout,
            )
        })?;
        step(2, "engine", || {
            install::install_engine(self.source, &artifacts.engine, &self.layout)
        })?;
        let model_bytes = step(3, "model", || {
            install::install_model(self.source, &artifacts.model, &self.layout)
        })?;
        step(4, "bridge", || {
            install::install_bridge(self.source, &artifacts.bridge, &self.layout)
        })?;
        let patch = step(5, "engine_config", || self.patch())?;
        let policy_file = step(6, "policy", || self.write_policy())?;

        Ok(InstallReport {
            library_path,
            model_bytes,
            patch,
            policy_file,
        })
    }

    /// Patch the installed engine config in place.
    pub fn patch(&self) -> Result<PatchReport, SetupError> {
        engine_config::patch_file(
            &self.layout.engine_config,
            &self.config.engine.edits,
            self.config.engine.rules.as_ref(),
        )
    }

    /// Regenerate the bot-policy file.
    pub fn write_policy(&self) -> Result<PathBuf, SetupError> {
        BotPolicy::from(&self.config.policy).write_to(&self.layout.policy_file)?;
        Ok(self.layout.policy_file.clone())
    }

    /// The full run: install, then launch the bridge and block until it exits.
    ///
    /// The API key is checked before anything is downloaded. When the monitor is
    /// enabled it runs on `handle` from then until the bridge exits or a step
    /// fails.
    pub fn run(&self, handle: &Handle) -> Result<ExitStatus, SetupError> {
        let api_key = self.config.api_key()?;

        let monitor = self.config.monitor.enabled.then(|| {
            CpuMonitor::spawn(
                handle,
                ProcStatSampler,
                Duration::from_millis(self.config.monitor.interval_ms),
                true,
            )
        });

        let result = self.install().and_then(|report| {
            let plan =
                LaunchPlan::build(&self.config, &self.layout, &report.library_path, api_key)?;
            step(7, "launch", || launch::run(&plan))
        });

        if let Some(monitor) = monitor {
            monitor.shutdown(handle);
        }
        result
    }
}

/// Run one numbered step with start/finish logging.
fn step<T>(
    number: u8,
    name: &str,
    f: impl FnOnce() -> Result<T, SetupError>,
) -> Result<T, SetupError> {
    info!(step = number, name, "Step started");
    let started = Instant::now();
    match f() {
        Ok(value) => {
            info!(
                step = number,
                name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Step finished"
            );
            Ok(value)
        }
        Err(e) => {
            error!(step = number, name, kind = e.kind(), error = %e, "Step failed");
            Err(e)
        }
    }
}

/// One file in the install layout.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactStatus {
    pub name: &'static str,
    pub path: PathBuf,
    pub present: bool,
    /// Only reported for files that must be runnable
    pub executable: Option<bool>,
    /// Last modification time, RFC 3339
    pub modified: Option<String>,
}

/// Installation state of a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub workspace: PathBuf,
    pub artifacts: Vec<ArtifactStatus>,
    pub library_dirs: Vec<ArtifactStatus>,
    /// Empty when the engine directory holds exactly one binary, config and model
    pub engine_dir_problems: Vec<String>,
}

impl StatusReport {
    pub fn is_complete(&self) -> bool {
        self.engine_dir_problems.is_empty()
            && self
                .artifacts
                .iter()
                .chain(self.library_dirs.iter())
                .all(|a| a.present && a.executable != Some(false))
    }
}

/// Inspect the workspace without changing it.
pub fn status(config: &BotConfig) -> StatusReport {
    let layout = config.layout();
    let file = |name: &'static str, path: &Path, runnable: bool| ArtifactStatus {
        name,
        path: path.to_path_buf(),
        present: path.is_file(),
        executable: runnable.then(|| install::is_executable(path)),
        modified: modified_time(path),
    };

    let artifacts = vec![
        file("engine", &layout.engine_binary, true),
        file("engine_config", &layout.engine_config, false),
        file("model", &layout.model_file, false),
        file("bridge", &layout.bridge_binary, true),
        file("policy", &layout.policy_file, false),
    ];
    let library_dirs = layout
        .library_search_dirs
        .iter()
        .map(|dir| ArtifactStatus {
            name: "library_dir",
            path: dir.clone(),
            present: dir.is_dir(),
            executable: None,
            modified: modified_time(dir),
        })
        .collect();

    StatusReport {
        workspace: layout.workspace.clone(),
        artifacts,
        library_dirs,
        engine_dir_problems: engine_dir_problems(&layout),
    }
}

fn modified_time(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified).to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Count the binary, config and model by name anywhere under the engine directory.
fn engine_dir_problems(layout: &InstallLayout) -> Vec<String> {
    if !layout.engine_dir.is_dir() {
        return vec![format!(
            "engine directory {} does not exist",
            layout.engine_dir.display()
        )];
    }

    let expected = [
        ("binary", &layout.engine_binary),
        ("config", &layout.engine_config),
        ("model", &layout.model_file),
    ];
    let mut counts = [0usize; 3];
    for entry in WalkDir::new(&layout.engine_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        for (i, (_, path)) in expected.iter().enumerate() {
            if Some(entry.file_name()) == path.file_name() {
                counts[i] += 1;
            }
        }
    }

    expected
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count != 1)
        .map(|((what, path), count)| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("expected exactly one {} named {}, found {}", what, name, count)
        })
        .collect()
}
