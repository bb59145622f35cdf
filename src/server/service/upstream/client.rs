use async_trait::async_trait;

use crate::server::{
    config::Config,
    error::upstream::UpstreamError,
    service::{retry::RetryContext, upstream::JsonFetcher},
};

/// HTTP client for the upstream API.
///
/// Every request carries a fixed timeout; a timeout, transport error, non-2xx status or
/// non-JSON body counts as one failed attempt of the [`RetryContext`].
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    retry: RetryContext,
}

impl RemoteClient {
    /// Build the client from the upstream section of the configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.upstream_timeout)
            .build()?;

        let retry = RetryContext::new()
            .with_max_attempts(config.upstream_max_attempts)
            .with_delay(config.upstream_retry_delay)
            .with_backoff(config.upstream_retry_backoff);

        Ok(Self::new(http, retry))
    }

    /// Wrap a prebuilt HTTP client with the given retry policy
    pub fn new(http: reqwest::Client, retry: RetryContext) -> Self {
        Self { http, retry }
    }

    async fn fetch_once(&self, url: &str) -> Result<serde_json::Value, UpstreamError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| UpstreamError::Request {
                url: url.to_string(),
                source,
            })?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|source| UpstreamError::InvalidJson {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl JsonFetcher for RemoteClient {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, UpstreamError> {
        self.retry
            .execute_with_retry(url, || self.fetch_once(url))
            .await
    }
}
