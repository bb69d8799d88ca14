// Object storage adapter for device exports (plain HTTP PUT)
use crate::application::glucose_repository::DatasetStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    bucket_url: String,
}

impl HttpObjectStore {
    pub fn new(client: reqwest::Client, bucket_url: String) -> Self {
        Self {
            client,
            bucket_url: bucket_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.bucket_url, urlencoding::encode(key))
    }
}

#[async_trait]
impl DatasetStore for HttpObjectStore {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        let url = self.object_url(key);

        let response = self
            .client
            .put(&url)
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to upload {}", key))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Upload of {} failed with status {}: {}", key, status, body);
        }

        tracing::info!("Stored object {}", key);
        Ok(())
    }
}
