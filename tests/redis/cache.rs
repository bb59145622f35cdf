use std::time::Duration;

use earthlings::server::data::{CacheStore, RedisCache};
use earthlings_test_utils::{redis::RedisTest, TestError};
use fred::prelude::*;

const REDIS_URL: &str = "redis://127.0.0.1:6379";

async fn connected_cache() -> RedisCache {
    let cache = RedisCache::new(REDIS_URL, Duration::from_secs(1)).unwrap();
    cache.init().await.unwrap();
    cache
}

/// Expect a written value to be read back with the requested expiry
#[tokio::test]
async fn set_then_get_with_expiry() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let cache = connected_cache().await;

    cache
        .set(&redis.key(), "[]".to_string(), Duration::from_secs(10))
        .await
        .unwrap();

    assert_eq!(cache.get(&redis.key()).await.unwrap(), Some("[]".to_string()));

    let ttl: i64 = redis.redis_pool.ttl(redis.key()).await?;
    assert!(ttl > 0 && ttl <= 10);

    Ok(())
}

/// Expect None for a key that was never written
#[tokio::test]
async fn missing_key_is_none() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let cache = connected_cache().await;

    assert_eq!(cache.get(&redis.key()).await.unwrap(), None);

    Ok(())
}

/// Expect the lifecycle flags to follow init and close
#[tokio::test]
async fn availability_follows_lifecycle() {
    let cache = connected_cache().await;

    assert!(cache.is_available());
    assert!(cache.ping().await);

    cache.close().await;

    assert!(!cache.is_available());
    assert!(!cache.ping().await);
}
