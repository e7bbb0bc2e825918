//! Model fetcher: gzip download streamed into the engine directory.

use crate::config::{ArtifactSpec, InstallLayout};
use crate::error::SetupError;
use crate::fetch::{self, ArtifactSource};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::info;

pub fn install_model(
    source: &dyn ArtifactSource,
    artifact: &ArtifactSpec,
    layout: &InstallLayout,
) -> Result<u64, SetupError> {
    let compressed = layout.staging_path(&artifact.file_name);
    fetch::fetch_artifact(source, artifact, &compressed)?;

    std::fs::create_dir_all(&layout.engine_dir)?;
    let result = gunzip(&compressed, &layout.model_file);
    std::fs::remove_file(&compressed)?;
    let bytes = result?;

    info!(model = %layout.model_file.display(), bytes, "Model installed");
    Ok(bytes)
}

/// Decompress `src` into `dest`; `dest` is removed again if the stream is corrupt.
pub fn gunzip(src: &Path, dest: &Path) -> Result<u64, SetupError> {
    let mut decoder = GzDecoder::new(BufReader::new(File::open(src)?));
    let mut out = File::create(dest)?;
    match io::copy(&mut decoder, &mut out) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            drop(out);
            let _ = std::fs::remove_file(dest);
            Err(SetupError::Extract(format!(
                "Failed to decompress {}: {}",
                src.display(),
                e
            )))
        }
    }
}
