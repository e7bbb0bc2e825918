//! HTTP(S) artifact source backed by `reqwest`.

use super::ArtifactSource;
use crate::config::HttpConfig;
use crate::error::SetupError;
use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tracing::debug;

/// Streams response bodies straight to disk.
///
/// Calls block on the given runtime handle, so `fetch_to` must not be called from
/// inside an async task.
pub struct HttpSource {
    client: Client,
    handle: Handle,
}

impl HttpSource {
    pub fn new(config: &HttpConfig, handle: Handle) -> Result<Self, SetupError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SetupError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, handle })
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64, SetupError> {
        let fetch_err = |e: reqwest::Error| SetupError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        debug!(url, content_length = ?response.content_length(), "Response headers received");

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(fetch_err)?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

impl ArtifactSource for HttpSource {
    fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64, SetupError> {
        self.handle.block_on(self.download(url, dest))
    }
}
