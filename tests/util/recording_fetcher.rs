use async_trait::async_trait;
use earthlings::server::{
    error::upstream::UpstreamError,
    service::upstream::{JsonFetcher, RemoteClient},
};
use tokio::sync::Mutex;

use super::test_utils::test_upstream_client;

/// [`JsonFetcher`] forwarding to the test upstream client and recording every requested URL
pub struct RecordingFetcher {
    inner: RemoteClient,
    urls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self {
            inner: test_upstream_client(),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// URLs requested so far, in call order
    pub async fn urls(&self) -> Vec<String> {
        self.urls.lock().await.clone()
    }
}

#[async_trait]
impl JsonFetcher for RecordingFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, UpstreamError> {
        self.urls.lock().await.push(url.to_string());

        self.inner.fetch_json(url).await
    }
}
