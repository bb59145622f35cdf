use std::{sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::server::{
    config::{Config, LogFormat},
    data::{DbAuditStore, RedisCache},
    error::Error,
    model::app::AppState,
    service::{rate_limit::RateLimiter, upstream::RemoteClient},
};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "earthlings=info,info";

/// Install the global tracing subscriber in the configured format
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init(),
    }
}

/// Build the upstream HTTP client with the configured timeout and retry policy
pub fn build_upstream_client(config: &Config) -> Result<RemoteClient, Error> {
    Ok(RemoteClient::from_config(config)?)
}

/// Create the cache and try to connect it.
///
/// A connection failure is logged and leaves the cache unavailable; the service then resolves
/// every request from upstream.
pub async fn connect_to_cache(config: &Config) -> Result<Arc<RedisCache>, Error> {
    let cache = RedisCache::new(&config.valkey_url, config.store_timeout)?;

    if let Err(e) = cache.init().await {
        tracing::warn!("Cache unavailable, continuing without it: {}", e);
    }

    Ok(Arc::new(cache))
}

/// Create the audit store and, when a database is configured, connect and migrate it.
///
/// Failures are logged and leave the store unavailable.
pub async fn connect_to_database(config: &Config) -> Arc<DbAuditStore> {
    let audit = DbAuditStore::new();

    match config.database_url.as_deref() {
        Some(database_url) => {
            if let Err(e) = audit.init(database_url).await {
                tracing::warn!("Audit database unavailable, continuing without it: {}", e);
            }
        }
        None => tracing::info!("DATABASE_URL not set, audit log disabled"),
    }

    Arc::new(audit)
}

/// Assemble the handler state from the connected collaborators
pub fn build_state(
    config: &Config,
    cache: Arc<RedisCache>,
    audit: Arc<DbAuditStore>,
    upstream: RemoteClient,
) -> AppState {
    AppState {
        cache,
        audit,
        upstream: Arc::new(upstream),
        rate_limiter: Arc::new(RateLimiter::new(config.rate_limit, config.rate_limit_per)),
        upstream_url: Arc::from(config.upstream_url.as_str()),
        cache_ttl: config.cache_ttl,
        store_timeout: config.store_timeout,
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Close both stores, giving each at most `timeout`
pub async fn close_stores(cache: &RedisCache, audit: &DbAuditStore, timeout: Duration) {
    if tokio::time::timeout(timeout, cache.close()).await.is_err() {
        tracing::warn!("Timed out closing the cache");
    }

    if tokio::time::timeout(timeout, audit.close()).await.is_err() {
        tracing::warn!("Timed out closing the audit database");
    }
}
