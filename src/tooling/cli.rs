//! CLI Tooling
//!
//! Command-line interface for the bootstrap workflow. Every command is scoped to
//! one workspace directory and is safe to repeat.

use crate::config::{BotConfig, ConfigLoader};
use crate::error::SetupError;
use crate::fetch::HttpSource;
use crate::launch;
use crate::logging::LoggingConfig;
use crate::policy::BotPolicy;
use crate::tooling::format::format_status_text;
use crate::workflow::{self, Workflow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

/// ogsbot - install KataGo and gtp2ogs, then run the bot
#[derive(Parser)]
#[command(name = "ogsbot")]
#[command(about = "Bootstrap a KataGo bot for the Online Go Server and launch it")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// `base` with any logging flags applied on top.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if self.log_file.is_some() {
            config.file = self.log_file.clone();
        }
        config
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install everything, then launch the bridge and wait for it
    Run {
        /// Server API key (overrides launch.api_key)
        #[arg(long)]
        apikey: Option<String>,

        /// Print CPU utilisation while the bot runs
        #[arg(long)]
        monitor: bool,
    },
    /// Download and prepare everything without launching
    Install,
    /// Re-apply the engine config edits to an installed engine
    Patch,
    /// Write the bot-policy file
    Policy {
        /// Print the JSON instead of writing the file
        #[arg(long)]
        stdout: bool,
    },
    /// Show which parts of the install are present
    Status {
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Result of one command: text for stdout and the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CommandOutput {
    fn text(text: String) -> Self {
        Self { text, exit_code: 0 }
    }
}

/// CLI context for one workspace
pub struct CliContext {
    config: BotConfig,
    runtime: Runtime,
}

impl CliContext {
    pub fn new(workspace: PathBuf, config_path: Option<PathBuf>) -> Result<Self, SetupError> {
        let config = ConfigLoader::load_for(&workspace, config_path.as_deref())?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(Self { config, runtime })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, SetupError> {
        match command {
            Commands::Run { apikey, monitor } => {
                let mut config = self.config.clone();
                if let Some(key) = apikey {
                    config.launch.api_key = Some(key.clone());
                }
                if *monitor {
                    config.monitor.enabled = true;
                }
                let source = HttpSource::new(&config.http, self.runtime.handle().clone())?;
                let workflow = Workflow::new(config, &source)?;
                let status = workflow.run(self.runtime.handle())?;
                let exit_code = launch::exit_code(status);
                Ok(CommandOutput {
                    text: format!("Bridge exited with {}", status),
                    exit_code,
                })
            }
            Commands::Install => {
                let source = HttpSource::new(&self.config.http, self.runtime.handle().clone())?;
                let workflow = Workflow::new(self.config.clone(), &source)?;
                let report = workflow.install()?;
                let layout = workflow.layout();
                Ok(CommandOutput::text(format!(
                    "Installed into {}\n  engine: {}\n  model: {} ({} bytes)\n  bridge: {}\n  policy: {}",
                    layout.workspace.display(),
                    layout.engine_binary.display(),
                    layout.model_file.display(),
                    report.model_bytes,
                    layout.bridge_binary.display(),
                    report.policy_file.display(),
                )))
            }
            Commands::Patch => {
                let layout = self.config.layout();
                let report = crate::engine_config::patch_file(
                    &layout.engine_config,
                    &self.config.engine.edits,
                    self.config.engine.rules.as_ref(),
                )?;
                let rules = if self.config.engine.rules.is_some() {
                    ", rule block replaced"
                } else {
                    ""
                };
                Ok(CommandOutput::text(format!(
                    "Patched {}: {} edits, {} -> {} lines (delta {}){}",
                    layout.engine_config.display(),
                    report.edits_applied,
                    report.lines_before,
                    report.lines_after,
                    report.line_delta,
                    rules,
                )))
            }
            Commands::Policy { stdout } => {
                let policy = BotPolicy::from(&self.config.policy);
                if *stdout {
                    return Ok(CommandOutput::text(policy.to_json()?));
                }
                let path = self.config.layout().policy_file;
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                policy.write_to(&path)?;
                Ok(CommandOutput::text(format!(
                    "Bot policy written to {}",
                    path.display()
                )))
            }
            Commands::Status { format } => {
                let report = workflow::status(&self.config);
                info!(complete = report.is_complete(), "Status collected");
                let text = match format.as_str() {
                    "json" => serde_json::to_string_pretty(&report).map_err(|e| {
                        SetupError::Config(format!("Failed to serialize status: {}", e))
                    })?,
                    "text" => format_status_text(&report),
                    other => {
                        return Err(SetupError::Config(format!(
                            "Unknown status format '{}' (expected text or json)",
                            other
                        )))
                    }
                };
                Ok(CommandOutput::text(text))
            }
        }
    }
}
