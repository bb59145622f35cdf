//! Optional collaborators of the orchestrator: the result cache and the audit log.
//!
//! Both are modelled as traits so the orchestrator depends only on their contract. Each store
//! has an explicit lifecycle (`init`/`close` on the concrete type) owned by the binary, and
//! reports whether it is currently usable through `is_available`.

pub mod audit;
pub mod cache;
pub mod query_log;

use std::time::Duration;

use async_trait::async_trait;

use crate::server::error::store::{AuditError, CacheError};

pub use audit::DbAuditStore;
pub use cache::RedisCache;

/// String key-value cache with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `false` until initialised and again after `close`
    fn is_available(&self) -> bool;

    /// Live readiness check.
    async fn ping(&self) -> bool;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

/// Append-only log of computed results.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// `false` until initialised and again after `close`
    fn is_available(&self) -> bool;

    /// Insert `payload` stamped with the current time.
    async fn append(&self, payload: serde_json::Value) -> Result<(), AuditError>;
}
