pub mod attachment;
pub mod lifecycle;
pub mod testing;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

/// A stored asset: the durable URL handed to clients plus the opaque
/// identifier the host's delete endpoint expects.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
}

/// The hosted media service, as the rest of the system sees it.
///
/// The production implementation talks HTTP to the media host; tests swap in
/// [`testing::RecordingStore`].
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, bytes: Bytes, folder: &str, filename: &str) -> Result<StoredMedia>;
    async fn delete(&self, public_id: &str) -> Result<()>;
}

/// HTTP client for the media host.
///
/// Upload: `POST {base}/upload/{folder}?filename=...` with the raw bytes,
/// answered with `{ "url": ..., "public_id": ... }`. Delete:
/// `DELETE {base}/assets/{public_id}`; a 404 from the host counts as done.
pub struct HostedMediaStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    url: String,
    public_id: String,
}

impl HostedMediaStore {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl MediaStore for HostedMediaStore {
    async fn store(&self, bytes: Bytes, folder: &str, filename: &str) -> Result<StoredMedia> {
        let reply: UploadReply = self
            .http
            .post(format!("{}/upload/{}", self.base_url, folder))
            .query(&[("filename", filename)])
            .header("x-api-key", &self.api_key)
            .body(bytes)
            .send()
            .await
            .context("media host unreachable")?
            .error_for_status()
            .context("media upload rejected")?
            .json()
            .await
            .context("malformed media host reply")?;

        info!("Stored {} as {}", filename, reply.public_id);
        Ok(StoredMedia {
            url: reply.url,
            public_id: reply.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        let resp = self
            .http
            .delete(format!("{}/assets/{}", self.base_url, public_id))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .context("media host unreachable")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            info!("Asset {} already gone", public_id);
            return Ok(());
        }
        resp.error_for_status().context("media delete rejected")?;
        Ok(())
    }
}
