//! Access to the upstream API.
//!
//! [`RemoteClient`] performs single GET requests with bounded retries and yields raw JSON.
//! [`PaginationResolver`] builds on any [`JsonFetcher`] to read every page of a listing
//! concurrently and concatenate the results in page order.

pub mod client;
pub mod pagination;


use async_trait::async_trait;

use crate::server::error::upstream::UpstreamError;

pub use client::RemoteClient;
pub use pagination::PaginationResolver;

/// Source of JSON documents addressed by URL.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, UpstreamError>;
}
