//! Per-step configuration sections.

use crate::engine_config::{ConfigEdit, RuleSet};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shared-library extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrariesConfig {
    /// Directory the packages are extracted into (relative to the workspace)
    #[serde(default = "default_lib_dir")]
    pub dir: PathBuf,

    /// Extraction command; `<archive> <dir>` is appended
    #[serde(default = "default_extractor")]
    pub extractor: Vec<String>,

    /// Subdirectories of `dir` that make up the library search path, in order
    #[serde(default = "default_search_dirs")]
    pub search_dirs: Vec<PathBuf>,
}

fn default_lib_dir() -> PathBuf {
    PathBuf::from("libs")
}

fn default_extractor() -> Vec<String> {
    vec!["dpkg-deb".to_string(), "-x".to_string()]
}

fn default_search_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("usr/lib/x86_64-linux-gnu"),
        PathBuf::from("lib/x86_64-linux-gnu"),
    ]
}

impl Default for LibrariesConfig {
    fn default() -> Self {
        Self {
            dir: default_lib_dir(),
            extractor: default_extractor(),
            search_dirs: default_search_dirs(),
        }
    }
}

/// Engine install and config-patch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Engine directory (relative to the workspace)
    #[serde(default = "default_engine_dir")]
    pub dir: PathBuf,

    /// Engine binary, relative to the engine directory
    #[serde(default = "default_engine_binary")]
    pub binary: PathBuf,

    /// Engine text configuration, relative to the engine directory
    #[serde(default = "default_engine_config")]
    pub config_file: PathBuf,

    /// Installed model file name inside the engine directory
    #[serde(default = "default_model_file")]
    pub model_file: String,

    /// Subcommand the engine is started with
    #[serde(default = "default_engine_command")]
    pub command: String,

    /// Keyed edits applied to the engine config, in order
    #[serde(default = "default_edits")]
    pub edits: Vec<ConfigEdit>,

    /// Replacement for the rules section; left untouched when unset
    #[serde(default)]
    pub rules: Option<RuleSet>,
}

fn default_engine_dir() -> PathBuf {
    PathBuf::from("katago")
}

fn default_engine_binary() -> PathBuf {
    PathBuf::from("katago")
}

fn default_engine_config() -> PathBuf {
    PathBuf::from("default_gtp.cfg")
}

fn default_model_file() -> String {
    "kata1-b18c384nbt-s9937771520-d4300882049.bin".to_string()
}

fn default_engine_command() -> String {
    "gtp".to_string()
}

fn default_edits() -> Vec<ConfigEdit> {
    vec![
        ConfigEdit::set("logSearchInfo", "true"),
        ConfigEdit::set("ogsChatToStderr", "True"),
        ConfigEdit::disable("maxVisits"),
        ConfigEdit::set("maxTime", "1.0"),
        ConfigEdit::set("ponderingEnabled", "true"),
    ]
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            dir: default_engine_dir(),
            binary: default_engine_binary(),
            config_file: default_engine_config(),
            model_file: default_model_file(),
            command: default_engine_command(),
            edits: default_edits(),
            rules: None,
        }
    }
}

/// Bridge invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Server API key passed to the bridge
    #[serde(default)]
    pub api_key: Option<String>,

    /// Bot-policy file written for the bridge (relative to the workspace)
    #[serde(default = "default_policy_file")]
    pub policy_file: PathBuf,

    /// Environment variable that receives the library search path
    #[serde(default = "default_library_path_var")]
    pub library_path_var: String,
}

fn default_policy_file() -> PathBuf {
    PathBuf::from("kata_speed.json5")
}

fn default_library_path_var() -> String {
    "LD_LIBRARY_PATH".to_string()
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            policy_file: default_policy_file(),
            library_path_var: default_library_path_var(),
        }
    }
}

/// CPU monitor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Sampling window in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_interval_ms(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout; none by default since the model is large
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("ogsbot/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}
