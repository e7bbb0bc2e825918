//! Engine configuration patcher.
//!
//! The engine ships a line-oriented `key = value` file. Rather than overwriting
//! fixed line numbers, the patcher parses the file, addresses settings by key and
//! refuses to write anything if an expected key is missing.

pub mod document;
pub mod edit;
pub mod rules;

pub use document::{EngineConfig, Entry, Line, LineKind};
pub use edit::ConfigEdit;
pub use rules::{RuleSet, RULE_KEYS};

use crate::error::SetupError;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of patching one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub lines_before: usize,
    pub lines_after: usize,
    /// Net line change; non-zero only when the rules block was replaced
    pub line_delta: isize,
    pub edits_applied: usize,
}

/// Apply `edits` and the optional rule block to `config`.
pub fn patch(
    config: &mut EngineConfig,
    edits: &[ConfigEdit],
    rules: Option<&RuleSet>,
) -> Result<PatchReport, SetupError> {
    let lines_before = config.line_count();
    for edit in edits {
        config.apply_edit(edit)?;
        debug!(key = edit.key(), "Applied config edit");
    }
    let line_delta = match rules {
        Some(rules) => config.replace_rule_block(rules)?,
        None => 0,
    };
    Ok(PatchReport {
        lines_before,
        lines_after: config.line_count(),
        line_delta,
        edits_applied: edits.len(),
    })
}

/// Patch the file at `path` in place. Nothing is written if any edit fails.
pub fn patch_file(
    path: &Path,
    edits: &[ConfigEdit],
    rules: Option<&RuleSet>,
) -> Result<PatchReport, SetupError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SetupError::MissingArtifact(path.to_path_buf()),
        _ => SetupError::Io(e),
    })?;
    let mut config = EngineConfig::parse(&text);
    let report = patch(&mut config, edits, rules)?;
    std::fs::write(path, config.render())?;

    info!(
        path = %path.display(),
        edits = report.edits_applied,
        delta = report.line_delta,
        "Engine config patched"
    );
    Ok(report)
}
