//! In-memory artifact source for tests and offline runs against prepared bytes.

use super::ArtifactSource;
use crate::error::SetupError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;

/// Serves registered URLs from memory and records every request.
#[derive(Default)]
pub struct MemorySource {
    bodies: RwLock<HashMap<String, Vec<u8>>>,
    requests: RwLock<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &str, body: Vec<u8>) {
        self.bodies.write().insert(url.to_string(), body);
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().clone()
    }
}

impl ArtifactSource for MemorySource {
    fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64, SetupError> {
        self.requests.write().push(url.to_string());
        let body = self
            .bodies
            .read()
            .get(url)
            .cloned()
            .ok_or_else(|| SetupError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })?;
        std::fs::write(dest, &body)?;
        Ok(body.len() as u64)
    }
}
