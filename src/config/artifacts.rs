//! Download locations for every artifact the workflow installs.

use serde::{Deserialize, Serialize};

/// A single downloadable artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Source URL
    pub url: String,

    /// File name the download is stored under inside the workspace
    pub file_name: String,

    /// Pinned digest, `sha256:<hex>` or `blake3:<hex>`; unverified when absent
    #[serde(default)]
    pub checksum: Option<String>,
}

impl ArtifactSpec {
    pub fn new(url: &str, file_name: &str) -> Self {
        Self {
            url: url.to_string(),
            file_name: file_name.to_string(),
            checksum: None,
        }
    }
}

/// All artifacts, in install order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Shared-library packages extracted into the library directory
    #[serde(default = "default_libraries")]
    pub libraries: Vec<ArtifactSpec>,

    /// Zip-packaged engine
    #[serde(default = "default_engine")]
    pub engine: ArtifactSpec,

    /// Gzip-compressed network weights
    #[serde(default = "default_model")]
    pub model: ArtifactSpec,

    /// Bridge executable; `file_name` is also the installed binary name
    #[serde(default = "default_bridge")]
    pub bridge: ArtifactSpec,
}

fn default_libraries() -> Vec<ArtifactSpec> {
    vec![
        ArtifactSpec::new(
            "http://archive.ubuntu.com/ubuntu/pool/universe/libz/libzip/libzip5_1.5.1-0ubuntu1_amd64.deb",
            "libzip5_1.5.1-0ubuntu1_amd64.deb",
        ),
        ArtifactSpec::new(
            "http://archive.ubuntu.com/ubuntu/pool/main/o/openssl/libssl1.1_1.1.1f-1ubuntu2_amd64.deb",
            "libssl1.1_1.1.1f-1ubuntu2_amd64.deb",
        ),
    ]
}

fn default_engine() -> ArtifactSpec {
    ArtifactSpec::new(
        "https://github.com/lightvector/KataGo/releases/download/v1.15.3/katago-v1.15.3-eigen-linux-x64.zip",
        "katago-v1.15.3-eigen-linux-x64.zip",
    )
}

fn default_model() -> ArtifactSpec {
    ArtifactSpec::new(
        "https://media.katagotraining.org/uploaded/networks/models/kata1/kata1-b18c384nbt-s9937771520-d4300882049.bin.gz",
        "kata1-b18c384nbt-s9937771520-d4300882049.bin.gz",
    )
}

fn default_bridge() -> ArtifactSpec {
    ArtifactSpec::new(
        "https://github.com/online-go/gtp2ogs/releases/download/9.0/gtp2ogs-9.0.0-linux",
        "gtp2ogs",
    )
}

impl ArtifactsConfig {
    /// Every artifact in install order.
    pub fn all(&self) -> impl Iterator<Item = &ArtifactSpec> {
        self.libraries
            .iter()
            .chain([&self.engine, &self.model, &self.bridge])
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            libraries: default_libraries(),
            engine: default_engine(),
            model: default_model(),
            bridge: default_bridge(),
        }
    }
}
