//! Artifact integrity checks.
//!
//! A pinned checksum is written `<algorithm>:<hex digest>`. SHA-256 matches what
//! release pages publish; BLAKE3 is accepted for self-hosted mirrors.

use crate::error::SetupError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Sha256,
    Blake3,
}

impl ChecksumAlgorithm {
    fn name(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Blake3 => "blake3",
        }
    }
}

/// A parsed, pinned checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    pub digest: [u8; 32],
}

impl Checksum {
    pub fn parse(spec: &str) -> Result<Self, SetupError> {
        let (algo, hex_digest) = spec.trim().split_once(':').ok_or_else(|| {
            SetupError::Config(format!(
                "Checksum '{}' must look like sha256:<hex> or blake3:<hex>",
                spec
            ))
        })?;
        let algorithm = match algo.to_ascii_lowercase().as_str() {
            "sha256" => ChecksumAlgorithm::Sha256,
            "blake3" => ChecksumAlgorithm::Blake3,
            other => {
                return Err(SetupError::Config(format!(
                    "Unsupported checksum algorithm: {}",
                    other
                )))
            }
        };
        let bytes = hex::decode(hex_digest.trim())
            .map_err(|e| SetupError::Config(format!("Invalid checksum hex '{}': {}", spec, e)))?;
        let digest: [u8; 32] = bytes.try_into().map_err(|_| {
            SetupError::Config(format!("Checksum '{}' must be 32 bytes (64 hex chars)", spec))
        })?;
        Ok(Self { algorithm, digest })
    }

    /// Hash `path` with this checksum's algorithm.
    pub fn compute(algorithm: ChecksumAlgorithm, path: &Path) -> Result<Self, SetupError> {
        let mut file = std::fs::File::open(path)?;
        let mut buf = vec![0u8; 64 * 1024];
        let digest: [u8; 32] = match algorithm {
            ChecksumAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                loop {
                    let n = file.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buf[..n]);
                }
                let mut out = [0u8; 32];
                out.copy_from_slice(&hasher.finalize());
                out
            }
            ChecksumAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                loop {
                    let n = file.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buf[..n]);
                }
                *hasher.finalize().as_bytes()
            }
        };
        Ok(Self { algorithm, digest })
    }

    /// Verify the file at `path`, naming `artifact` in the error.
    pub fn verify_file(&self, artifact: &str, path: &Path) -> Result<(), SetupError> {
        let actual = Self::compute(self.algorithm, path)?;
        if actual.digest != self.digest {
            return Err(SetupError::Integrity {
                artifact: artifact.to_string(),
                expected: self.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.name(), hex::encode(self.digest))
    }
}

/// Verify `path` against an optional pinned checksum string.
///
/// Returns whether a check was performed.
pub fn verify_pinned(
    artifact: &str,
    pinned: Option<&str>,
    path: &Path,
) -> Result<bool, SetupError> {
    match pinned {
        Some(spec) => {
            Checksum::parse(spec)?.verify_file(artifact, path)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
