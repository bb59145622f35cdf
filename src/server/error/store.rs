//! Cache and audit store error types.
//!
//! Both stores are optional collaborators. Their errors are logged and discarded by the
//! orchestrator and never decide the outcome of a request.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache was never initialised or has been closed.
    #[error("Cache is not available")]
    Unavailable,
    /// The operation did not complete within the store timeout.
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Redis(#[from] fred::error::Error),
}

#[derive(Error, Debug)]
pub enum AuditError {
    /// The audit database was never initialised or has been closed.
    #[error("Audit store is not available")]
    Unavailable,
    /// The write did not complete within the store timeout.
    #[error("Audit write timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
}
