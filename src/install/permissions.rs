//! Executable-bit helpers.

use crate::error::SetupError;
use std::path::Path;

/// Set mode 0755 on `path`.
#[cfg(unix)]
pub fn mark_executable(path: &Path) -> Result<(), SetupError> {
    use std::os::unix::fs::PermissionsExt;

    if !path.is_file() {
        return Err(SetupError::MissingArtifact(path.to_path_buf()));
    }
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
pub fn mark_executable(path: &Path) -> Result<(), SetupError> {
    if !path.is_file() {
        return Err(SetupError::MissingArtifact(path.to_path_buf()));
    }
    Ok(())
}

/// Whether `path` is a regular file with any execute bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
