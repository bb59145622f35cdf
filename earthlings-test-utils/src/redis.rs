use fred::prelude::*;

use crate::TestError;

/// Live Redis test setup with automatic cleanup
///
/// Requires a Redis/Valkey instance on `127.0.0.1:6379`; only used by tests compiled with the
/// `redis-test` feature. Each instance owns a unique key that is deleted on drop.
pub struct RedisTest {
    pub redis_pool: Pool,
    key: String,
}

impl RedisTest {
    /// Create a new RedisTest instance with a unique key
    pub async fn new() -> Result<Self, TestError> {
        let redis_config = Config::from_url("redis://127.0.0.1:6379")?;
        let redis_pool = Pool::new(redis_config, None, None, None, 2)?;
        redis_pool.init().await?;

        Ok(RedisTest {
            redis_pool,
            key: Self::generate_unique_key(),
        })
    }

    /// The key reserved for this test instance
    pub fn key(&self) -> String {
        self.key.clone()
    }

    /// Generate a unique key using timestamp and thread ID
    fn generate_unique_key() -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let thread_id = std::thread::current().id();

        let mut hasher = DefaultHasher::new();
        timestamp.hash(&mut hasher);
        thread_id.hash(&mut hasher);
        let hash = hasher.finish();

        format!("test:{}:{:x}:data", timestamp, hash)
    }
}

impl Drop for RedisTest {
    fn drop(&mut self) {
        // Spawn instead of blocking to avoid "runtime within runtime" errors
        let pool = self.redis_pool.clone();
        let key = self.key.clone();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _: Result<(), fred::error::Error> = pool.del(&key).await;
            });
        }
    }
}
