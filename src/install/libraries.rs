//! Shared-library packages: download, extract with an external tool, expose the
//! resulting directories as a search path for the launched process.

use crate::config::{ArtifactSpec, InstallLayout, LibrariesConfig};
use crate::error::SetupError;
use crate::fetch::{self, ArtifactSource};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Ordered library directories for the dynamic loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySearchPath {
    dirs: Vec<PathBuf>,
}

impl LibrarySearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Join the directories, followed by `inherited` when it is non-empty.
    pub fn join_with(&self, inherited: Option<&OsString>) -> Result<OsString, SetupError> {
        let mut parts: Vec<PathBuf> = self.dirs.clone();
        if let Some(existing) = inherited.filter(|v| !v.is_empty()) {
            parts.extend(std::env::split_paths(existing));
        }
        std::env::join_paths(parts)
            .map_err(|e| SetupError::Config(format!("Invalid library search path: {}", e)))
    }
}

/// Download and unpack every library package, then check the search directories.
pub fn install_libraries(
    source: &dyn ArtifactSource,
    packages: &[ArtifactSpec],
    config: &LibrariesConfig,
    layout: &InstallLayout,
) -> Result<LibrarySearchPath, SetupError> {
    std::fs::create_dir_all(&layout.lib_dir)?;

    for package in packages {
        let archive = layout.staging_path(&package.file_name);
        fetch::fetch_artifact(source, package, &archive)?;
        let extracted = run_extractor(&config.extractor, &archive, &layout.lib_dir);
        std::fs::remove_file(&archive)?;
        extracted?;
        debug!(package = %package.file_name, "Removed package archive");
    }

    for dir in &layout.library_search_dirs {
        if !dir.is_dir() {
            return Err(SetupError::MissingLibraryPath(dir.clone()));
        }
    }

    info!(
        dirs = ?layout.library_search_dirs,
        "Shared libraries installed"
    );
    Ok(LibrarySearchPath::new(layout.library_search_dirs.clone()))
}

/// Run `extractor... <archive> <dest>`.
fn run_extractor(extractor: &[String], archive: &Path, dest: &Path) -> Result<(), SetupError> {
    let (program, args) = extractor
        .split_first()
        .ok_or_else(|| SetupError::Config("Empty extractor command".to_string()))?;

    debug!(program = %program, archive = %archive.display(), "Extracting package");
    let status = Command::new(program)
        .args(args)
        .arg(archive)
        .arg(dest)
        .status()
        .map_err(|e| SetupError::Extract(format!("Failed to run {}: {}", program, e)))?;

    if !status.success() {
        return Err(SetupError::Extract(format!(
            "{} exited with {} for {}",
            program,
            status,
            archive.display()
        )));
    }
    Ok(())
}
