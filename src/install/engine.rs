//! Engine installer: zip download, full extraction, executable bit.

use super::permissions::mark_executable;
use crate::config::{ArtifactSpec, InstallLayout};
use crate::error::SetupError;
use crate::fetch::{self, ArtifactSource};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Download the engine archive, unpack it into the engine directory and make the
/// engine binary runnable.
pub fn install_engine(
    source: &dyn ArtifactSource,
    artifact: &ArtifactSpec,
    layout: &InstallLayout,
) -> Result<(), SetupError> {
    let archive = layout.staging_path(&artifact.file_name);
    fetch::fetch_artifact(source, artifact, &archive)?;

    std::fs::create_dir_all(&layout.engine_dir)?;
    let extracted = extract_zip(&archive, &layout.engine_dir);
    std::fs::remove_file(&archive)?;
    let entries = extracted?;

    if !layout.engine_binary.is_file() {
        return Err(SetupError::MissingArtifact(layout.engine_binary.clone()));
    }
    mark_executable(&layout.engine_binary)?;

    info!(
        entries,
        binary = %layout.engine_binary.display(),
        "Engine installed"
    );
    Ok(())
}

/// Extract every entry of `archive` below `dest`, returning the number of files written.
///
/// Entries whose names would land outside `dest` are rejected.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize, SetupError> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| {
        SetupError::Extract(format!("{} is not a zip archive: {}", archive.display(), e))
    })?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| SetupError::Extract(format!("Corrupt zip entry {}: {}", i, e)))?;
        let relative = entry.enclosed_name().map(Path::to_path_buf).ok_or_else(|| {
            SetupError::Extract(format!("Zip entry escapes target directory: {}", entry.name()))
        })?;
        let out_path = dest.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out).map_err(|e| {
            SetupError::Extract(format!("Failed to extract {}: {}", relative.display(), e))
        })?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            // owner keeps read/write so the next run can overwrite the file
            let mode = (mode & 0o777) | 0o600;
            std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))?;
        }

        debug!(entry = %relative.display(), "Extracted");
        written += 1;
    }
    Ok(written)
}
