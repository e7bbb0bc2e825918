//! Error types for the bootstrap workflow.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing or launching the bot.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Server returned {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Downloaded bytes do not match the pinned checksum.
    #[error("Integrity check failed for {artifact}: expected {expected}, got {actual}")]
    Integrity {
        artifact: String,
        expected: String,
        actual: String,
    },

    #[error("Extraction failed: {0}")]
    Extract(String),

    #[error("Expected artifact not found: {0}")]
    MissingArtifact(PathBuf),

    #[error("Library search directory missing after extraction: {0}")]
    MissingLibraryPath(PathBuf),

    #[error("Engine config has no entry for key '{0}'")]
    MissingConfigKey(String),

    #[error("Launch failed: {0}")]
    Launch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for SetupError {
    fn from(err: config::ConfigError) -> Self {
        SetupError::Config(err.to_string())
    }
}

impl SetupError {
    /// Short machine-readable kind, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SetupError::Config(_) => "config",
            SetupError::Fetch { .. } => "fetch",
            SetupError::HttpStatus { .. } => "http_status",
            SetupError::Integrity { .. } => "integrity",
            SetupError::Extract(_) => "extract",
            SetupError::MissingArtifact(_) => "missing_artifact",
            SetupError::MissingLibraryPath(_) => "missing_library_path",
            SetupError::MissingConfigKey(_) => "missing_config_key",
            SetupError::Launch(_) => "launch",
            SetupError::Io(_) => "io",
        }
    }
}
