//! Launcher: wires the bridge to the engine and blocks until the bridge exits.

use crate::config::{BotConfig, InstallLayout};
use crate::error::SetupError;
use crate::install::LibrarySearchPath;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use tracing::info;

/// Everything needed to start the bridge process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: PathBuf,
    /// Variables set on the child only
    pub env: Vec<(String, OsString)>,
}

impl LaunchPlan {
    /// Build the bridge command line:
    ///
    /// `<bridge> --apikey <key> --config <policy> -- <engine> <command> -config <cfg> -model <model>`
    ///
    /// Engine paths are relative to the workspace, which is the child's working
    /// directory.
    pub fn build(
        config: &BotConfig,
        layout: &InstallLayout,
        search_path: &LibrarySearchPath,
        api_key: &str,
    ) -> Result<Self, SetupError> {
        let rel = |path: &PathBuf| layout.display_relative(path).as_os_str().to_os_string();

        let args: Vec<OsString> = vec![
            "--apikey".into(),
            api_key.into(),
            "--config".into(),
            rel(&layout.policy_file),
            "--".into(),
            rel(&layout.engine_binary),
            config.engine.command.clone().into(),
            "-config".into(),
            rel(&layout.engine_config),
            "-model".into(),
            rel(&layout.model_file),
        ];

        let var = config.launch.library_path_var.clone();
        let inherited = std::env::var_os(&var);
        let library_path = search_path.join_with(inherited.as_ref())?;

        Ok(Self {
            program: layout.bridge_binary.clone(),
            args,
            working_dir: layout.workspace.clone(),
            env: vec![(var, library_path)],
        })
    }

    /// Arguments with the API key masked, for logging.
    pub fn redacted_args(&self) -> Vec<String> {
        let mut masked = Vec::with_capacity(self.args.len());
        let mut hide_next = false;
        for arg in &self.args {
            if hide_next {
                masked.push("********".to_string());
                hide_next = false;
                continue;
            }
            hide_next = arg == "--apikey";
            masked.push(arg.to_string_lossy().into_owned());
        }
        masked
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(&self.working_dir);
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command
    }
}

/// Start the bridge and wait for it to exit.
pub fn run(plan: &LaunchPlan) -> Result<ExitStatus, SetupError> {
    info!(
        program = %plan.program.display(),
        args = ?plan.redacted_args(),
        "Starting bridge"
    );
    let status = plan.command().status().map_err(|e| {
        SetupError::Launch(format!(
            "Failed to start {}: {}",
            plan.program.display(),
            e
        ))
    })?;
    info!(%status, "Bridge exited");
    Ok(status)
}

/// Exit code for the current process given the bridge's status; 1 when the
/// bridge was killed by a signal.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
