//! Per-client token bucket rate limiting.
//!
//! Every client key owns a bucket holding up to `capacity` tokens, refilled continuously at
//! `capacity / per` tokens per second. A request consumes one token; a request finding less than
//! one token is rejected with the number of seconds until a token will be available.
//!
//! ## Cleanup
//!
//! Buckets untouched for longer than `per` have refilled completely, so dropping them is not
//! observable by clients. A sweep removing them runs every [`SWEEP_INTERVAL`] checks, inside
//! the same critical section as the check itself.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::{sync::Mutex, time::Instant};

use crate::server::error::rate_limit::RateLimitError;

/// Sweep idle buckets every time this many checks are made
const SWEEP_INTERVAL: u64 = 1000;

#[derive(Debug, Clone, Copy)]
struct TokenBucket {
    tokens: f64,
    last_touch: Instant,
}

/// Per-key token buckets refilled continuously at `capacity / per`
pub struct RateLimiter {
    capacity: f64,
    per: Duration,
    buckets: Mutex<HashMap<String, TokenBucket>>,
    /// Counter for tracking when to sweep idle buckets
    checks: AtomicU64,
}

impl RateLimiter {
    /// Creates a limiter admitting `capacity` requests per `per` for each key.
    ///
    /// `capacity` and `per` must be non-zero; the configuration rejects zero values.
    pub fn new(capacity: u32, per: Duration) -> Self {
        Self {
            capacity: f64::from(capacity),
            per,
            buckets: Mutex::new(HashMap::new()),
            checks: AtomicU64::new(0),
        }
    }

    /// Admit or reject a request from `key` at the current time.
    pub async fn check(&self, key: &str) -> Result<(), RateLimitError> {
        self.check_at(key, Instant::now()).await
    }

    /// Admit or reject a request from `key` made at `now`.
    ///
    /// The refill, the comparison and the decrement happen under one lock, so concurrent
    /// requests from the same key can never spend the same token twice.
    pub async fn check_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut buckets = self.buckets.lock().await;

        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.sweep(&mut buckets, now);
        }

        let capacity = self.capacity;
        let per = self.per.as_secs_f64();
        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: capacity,
            last_touch: now,
        });

        let elapsed = now.saturating_duration_since(bucket.last_touch);
        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * capacity / per).min(capacity);
        bucket.last_touch = now;

        if bucket.tokens < 1.0 {
            let retry_after = ((1.0 - bucket.tokens) * per / capacity).ceil().max(1.0) as u64;

            return Err(RateLimitError::Exceeded {
                key: key.to_string(),
                retry_after,
            });
        }

        bucket.tokens -= 1.0;

        Ok(())
    }

    /// Number of keys currently tracked
    pub async fn tracked_keys(&self) -> usize {
        self.buckets.lock().await.len()
    }

    fn sweep(&self, buckets: &mut HashMap<String, TokenBucket>, now: Instant) {
        let before = buckets.len();
        buckets.retain(|_, bucket| now.saturating_duration_since(bucket.last_touch) <= self.per);

        tracing::debug!(
            "Rate limiter swept {} idle buckets, {} remain",
            before - buckets.len(),
            buckets.len()
        );
    }
}
