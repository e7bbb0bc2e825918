//! Artifact downloads.
//!
//! Every step that needs bytes from the network goes through an [`ArtifactSource`],
//! so the install steps can run against an in-memory source in tests.

pub mod http;
pub mod memory;

pub use http::HttpSource;
pub use memory::MemorySource;

use crate::config::ArtifactSpec;
use crate::error::SetupError;
use crate::integrity;
use std::path::Path;
use tracing::{debug, info, warn};

/// Something that can copy a URL's content to a local file.
pub trait ArtifactSource: Send + Sync {
    /// Write the body at `url` to `dest`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64, SetupError>;
}

/// Download `artifact` to `dest` and check it against its pinned checksum.
///
/// On any failure the partially written file is removed, so a failed fetch never
/// leaves something that looks like a finished download.
pub fn fetch_artifact(
    source: &dyn ArtifactSource,
    artifact: &ArtifactSpec,
    dest: &Path,
) -> Result<u64, SetupError> {
    info!(url = %artifact.url, dest = %dest.display(), "Downloading artifact");

    let result = source.fetch_to(&artifact.url, dest).and_then(|bytes| {
        let verified =
            integrity::verify_pinned(&artifact.file_name, artifact.checksum.as_deref(), dest)?;
        if verified {
            debug!(file = %artifact.file_name, "Checksum verified");
        } else {
            warn!(file = %artifact.file_name, "No checksum pinned, skipping integrity check");
        }
        Ok(bytes)
    });

    match result {
        Ok(bytes) => {
            info!(file = %artifact.file_name, bytes, "Downloaded artifact");
            Ok(bytes)
        }
        Err(e) => {
            if dest.exists() {
                if let Err(remove_err) = std::fs::remove_file(dest) {
                    warn!(
                        path = %dest.display(),
                        error = %remove_err,
                        "Failed to remove partial download"
                    );
                }
            }
            Err(e)
        }
    }
}
