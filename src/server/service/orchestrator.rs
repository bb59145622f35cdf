//! Cache-aside resolution of the Earth character list.
//!
//! The cache is consulted first. On a miss, an unavailable cache or an unreadable entry the
//! list is rebuilt from the upstream API and then written to the cache and the audit log.
//! Neither store can fail the request; only the upstream resolution can. Every store operation
//! is bounded by the store timeout so a stalled cache or database cannot hold the response.

use std::time::Duration;

use crate::{
    model::character::Character,
    server::{
        data::{AuditStore, CacheStore},
        error::{
            store::{AuditError, CacheError},
            upstream::UpstreamError,
        },
        model::upstream::Location,
        service::{
            earth::filter_by_origin,
            upstream::{JsonFetcher, PaginationResolver},
        },
    },
};

/// Cache key of the serialized character list
pub const CACHE_KEY: &str = "DATA";
/// Listing of every location named Earth, relative to the upstream base URL
pub const LOCATION_PATH: &str = "/location?name=Earth";
/// Listing of every living human, relative to the upstream base URL
pub const CHARACTER_PATH: &str = "/character?species=human&status=alive";

/// Orchestrator producing the list of living humans originating from an Earth
pub struct DataOrchestrator<'a> {
    cache: &'a dyn CacheStore,
    audit: &'a dyn AuditStore,
    upstream: &'a dyn JsonFetcher,
    upstream_url: &'a str,
    cache_ttl: Duration,
    store_timeout: Duration,
}

impl<'a> DataOrchestrator<'a> {
    pub fn new(
        cache: &'a dyn CacheStore,
        audit: &'a dyn AuditStore,
        upstream: &'a dyn JsonFetcher,
        upstream_url: &'a str,
        cache_ttl: Duration,
        store_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            audit,
            upstream,
            upstream_url,
            cache_ttl,
            store_timeout,
        }
    }

    /// Return the Earth characters, from cache when possible.
    ///
    /// # Returns
    /// - `Ok(Vec<Character>)` - Cached or freshly resolved characters, in upstream order
    /// - `Err(UpstreamError)` - The cache could not serve the request and upstream resolution
    ///   failed; nothing was written to either store
    pub async fn get_data(&self) -> Result<Vec<Character>, UpstreamError> {
        if let Some(characters) = self.read_cache().await {
            tracing::debug!("Serving {} characters from cache", characters.len());

            return Ok(characters);
        }

        let characters = self.resolve().await?;

        self.persist(&characters).await;

        Ok(characters)
    }

    /// Fetch Earth locations, then living humans, and keep those born on an Earth.
    pub async fn resolve(&self) -> Result<Vec<Character>, UpstreamError> {
        let resolver = PaginationResolver::new(self.upstream);

        let locations: Vec<Location> = resolver
            .resolve(&format!("{}{}", self.upstream_url, LOCATION_PATH))
            .await?;
        let characters: Vec<Character> = resolver
            .resolve(&format!("{}{}", self.upstream_url, CHARACTER_PATH))
            .await?;

        let total = characters.len();
        let earthlings = filter_by_origin(characters, &locations);

        tracing::info!(
            "Resolved {} Earth characters out of {} humans across {} Earth locations",
            earthlings.len(),
            total,
            locations.len()
        );

        Ok(earthlings)
    }

    /// Read and decode the cache entry; any failure is treated as a miss.
    async fn read_cache(&self) -> Option<Vec<Character>> {
        let read = tokio::time::timeout(self.store_timeout, self.cache.get(CACHE_KEY))
            .await
            .unwrap_or(Err(CacheError::Timeout(self.store_timeout)));

        let raw = match read {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("Cache miss for {}", CACHE_KEY);
                return None;
            }
            Err(e) => {
                tracing::warn!("Cache read failed, resolving from upstream: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(characters) => Some(characters),
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry {}: {}", CACHE_KEY, e);
                None
            }
        }
    }

    /// Write the result to the cache and the audit log concurrently.
    ///
    /// Both writes are awaited, each for at most the store timeout, so they finish or are
    /// abandoned before the response is sent. Their errors are logged and discarded here and
    /// nowhere else.
    async fn persist(&self, characters: &[Character]) {
        let payload = match serde_json::to_value(characters) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize characters for persistence: {}", e);
                return;
            }
        };
        let serialized = payload.to_string();

        let (cached, audited) = tokio::join!(
            tokio::time::timeout(
                self.store_timeout,
                self.cache.set(CACHE_KEY, serialized, self.cache_ttl),
            ),
            tokio::time::timeout(self.store_timeout, self.audit.append(payload)),
        );
        let cached = cached.unwrap_or(Err(CacheError::Timeout(self.store_timeout)));
        let audited = audited.unwrap_or(Err(AuditError::Timeout(self.store_timeout)));

        if let Err(e) = cached {
            tracing::warn!("Failed to cache characters: {}", e);
        }

        if let Err(e) = audited {
            tracing::warn!("Failed to write audit record: {}", e);
        }
    }
}
