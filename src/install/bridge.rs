//! Bridge installer: single executable, no extraction.

use super::permissions::mark_executable;
use crate::config::{ArtifactSpec, InstallLayout};
use crate::error::SetupError;
use crate::fetch::{self, ArtifactSource};
use tracing::info;

pub fn install_bridge(
    source: &dyn ArtifactSource,
    artifact: &ArtifactSpec,
    layout: &InstallLayout,
) -> Result<(), SetupError> {
    fetch::fetch_artifact(source, artifact, &layout.bridge_binary)?;
    mark_executable(&layout.bridge_binary)?;
    info!(bridge = %layout.bridge_binary.display(), "Bridge installed");
    Ok(())
}
