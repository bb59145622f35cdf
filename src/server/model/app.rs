use std::{sync::Arc, time::Duration};

use crate::server::{
    data::{AuditStore, CacheStore},
    service::{
        orchestrator::DataOrchestrator, rate_limit::RateLimiter, upstream::JsonFetcher,
    },
};

/// Shared handler state.
///
/// Collaborators are held as trait objects so the binary can inject the Redis cache, the
/// database audit log and the HTTP client while tests inject in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheStore>,
    pub audit: Arc<dyn AuditStore>,
    pub upstream: Arc<dyn JsonFetcher>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Upstream API base URL, without trailing slash
    pub upstream_url: Arc<str>,
    pub cache_ttl: Duration,
    /// Upper bound on each cache read, cache write and audit write
    pub store_timeout: Duration,
}

impl AppState {
    /// Orchestrator borrowing this state's collaborators for one request
    pub fn orchestrator(&self) -> DataOrchestrator<'_> {
        DataOrchestrator::new(
            self.cache.as_ref(),
            self.audit.as_ref(),
            self.upstream.as_ref(),
            &self.upstream_url,
            self.cache_ttl,
            self.store_timeout,
        )
    }
}
