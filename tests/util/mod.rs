//! Shared helpers for integration tests.

mod recording_fetcher;

pub use memory_cache::MemoryCache;
pub use recording_fetcher::RecordingFetcher;
pub use stalled_store::{Stall, StalledAudit, StalledCache};
pub use test_utils::{TestContextExt, TEST_MAX_ATTEMPTS, TEST_STORE_TIMEOUT};
