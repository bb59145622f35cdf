use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use fred::{
    prelude::*,
    types::{
        config::{ConnectionConfig, PerformanceConfig},
        Expiration,
    },
};

use crate::server::{data::CacheStore, error::store::CacheError};

const POOL_SIZE: usize = 6;

/// Redis/Valkey backed [`CacheStore`].
///
/// The pool is created unconnected. Until [`RedisCache::init`] succeeds every operation
/// returns [`CacheError::Unavailable`] without touching the network.
pub struct RedisCache {
    pool: Pool,
    available: AtomicBool,
}

impl RedisCache {
    /// Create an unconnected pool whose commands and connection attempts give up after
    /// `command_timeout`.
    pub fn new(valkey_url: &str, command_timeout: Duration) -> Result<Self, CacheError> {
        let config = Config::from_url(valkey_url)?;
        let performance = PerformanceConfig {
            default_command_timeout: command_timeout,
            ..Default::default()
        };
        let connection = ConnectionConfig {
            connection_timeout: command_timeout,
            ..Default::default()
        };
        let pool = Pool::new(config, Some(performance), Some(connection), None, POOL_SIZE)?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool, initialised or not.
    pub fn from_pool(pool: Pool) -> Self {
        Self {
            pool,
            available: AtomicBool::new(false),
        }
    }

    /// Connect the pool and mark the cache available.
    pub async fn init(&self) -> Result<(), CacheError> {
        self.pool.init().await?;
        self.available.store(true, Ordering::SeqCst);

        tracing::info!("Cache connection initialized");

        Ok(())
    }

    /// Close the pool and mark the cache unavailable.
    pub async fn close(&self) {
        if !self.available.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Err(e) = self.pool.quit().await {
            tracing::warn!("Failed to close cache connection cleanly: {}", e);
        }

        tracing::info!("Cache connection closed");
    }

    fn ensure_available(&self) -> Result<(), CacheError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(CacheError::Unavailable)
        }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn ping(&self) -> bool {
        if !self.is_available() {
            return false;
        }

        match self.pool.next().ping::<String>(None).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Cache ping failed: {}", e);
                false
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.ensure_available()?;

        Ok(self.pool.get::<Option<String>, _>(key).await?)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.ensure_available()?;

        // Redis rejects an expiry of 0
        let ttl_secs = ttl.as_secs().max(1) as i64;

        self.pool
            .set::<(), _, _>(key, value, Some(Expiration::EX(ttl_secs)), None, false)
            .await?;

        Ok(())
    }
}
