//! Tests for the cache-aside DataOrchestrator.
//!
//! Upstream listings are served by the mock server and each page mock states how often it must
//! be requested, so `assert_mocks` proves whether the orchestrator went upstream.

use earthlings::{
    model::character::Character,
    server::{
        data::DbAuditStore,
        error::upstream::UpstreamError,
        service::orchestrator::CACHE_KEY,
    },
};
use earthlings_test_utils::constant::{CHARACTER_PATH, LOCATION_PATH, LOCATION_QUERY};

use super::*;
use crate::util::{
    RecordingFetcher, Stall, StalledAudit, StalledCache, TEST_MAX_ATTEMPTS, TEST_STORE_TIMEOUT,
};

/// Far above the store timeout; reaching it means a stalled store held the call
const STALL_GUARD: Duration = Duration::from_secs(5);

fn earth_locations() -> Vec<Vec<serde_json::Value>> {
    vec![vec![
        factory::location(1, "Earth (C-137)"),
        factory::location(20, "Earth (Replacement Dimension)"),
    ]]
}

fn humans() -> Vec<Vec<serde_json::Value>> {
    vec![
        vec![
            factory::character(1, "Rick Sanchez", "Earth (C-137)"),
            factory::character(47, "Birdperson", "Bird World"),
        ],
        vec![
            factory::character(2, "Morty Smith", "unknown"),
            factory::character(4, "Beth Smith", "Earth (Replacement Dimension)"),
        ],
    ]
}

fn names(characters: &[Character]) -> Vec<&str> {
    characters.iter().map(|c| c.name.as_str()).collect()
}

mod get_data {
    use super::*;

    /// Expect a miss to resolve both listings, filter, then fill the cache and the audit log
    #[tokio::test]
    async fn resolves_and_persists_on_cache_miss() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let cache = Arc::new(MemoryCache::new());
        let state = test.app_state_with(cache.clone(), test.audit_store());

        let characters = state.orchestrator().get_data().await.unwrap();

        assert_eq!(names(&characters), vec!["Rick Sanchez", "Beth Smith"]);

        let (cached, ttl) = cache.entry(CACHE_KEY).await.unwrap();
        let decoded: Vec<Character> = serde_json::from_str(&cached)?;
        assert_eq!(decoded, characters);
        assert_eq!(ttl, state.cache_ttl);

        assert_eq!(test.audit_record_count().await?, 1);

        test.assert_mocks();

        Ok(())
    }

    /// Expect a cache hit to make no upstream request and no write
    #[tokio::test]
    async fn serves_cache_hit_without_upstream() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 0)
            .with_character_pages(humans(), 0)
            .build()
            .await?;

        let cached: Vec<Character> = vec![serde_json::from_value(factory::character(
            1,
            "Rick Sanchez",
            "Earth (C-137)",
        ))?];
        let cache =
            Arc::new(MemoryCache::with_entry(CACHE_KEY, serde_json::to_string(&cached)?).await);
        let state = test.app_state_with(cache.clone(), test.audit_store());

        let characters = state.orchestrator().get_data().await.unwrap();

        assert_eq!(characters, cached);
        assert_eq!(cache.writes(), 0);
        assert_eq!(test.audit_record_count().await?, 0);

        test.assert_mocks();

        Ok(())
    }

    /// Expect the second call within the TTL to be served from the first call's entry
    #[tokio::test]
    async fn second_call_hits_cache() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let state = test.into_app_state();

        let first = state.orchestrator().get_data().await.unwrap();
        let second = state.orchestrator().get_data().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(test.audit_record_count().await?, 1);

        test.assert_mocks();

        Ok(())
    }

    /// Expect an unreadable entry to be treated as a miss and replaced
    #[tokio::test]
    async fn replaces_unreadable_cache_entry() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let cache = Arc::new(MemoryCache::with_entry(CACHE_KEY, "{not json".to_string()).await);
        let state = test.app_state_with(cache.clone(), test.audit_store());

        let characters = state.orchestrator().get_data().await.unwrap();

        assert_eq!(characters.len(), 2);
        assert_eq!(cache.writes(), 1);

        test.assert_mocks();

        Ok(())
    }

    /// Expect the result to be returned and audited when the cache is down
    #[tokio::test]
    async fn succeeds_without_cache() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let state = test.app_state_with(Arc::new(MemoryCache::unavailable()), test.audit_store());

        let characters = state.orchestrator().get_data().await.unwrap();

        assert_eq!(characters.len(), 2);
        assert_eq!(test.audit_record_count().await?, 1);

        test.assert_mocks();

        Ok(())
    }

    /// Expect the result to be returned and cached when the audit database is down
    #[tokio::test]
    async fn succeeds_without_audit_store() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let cache = Arc::new(MemoryCache::new());
        let state = test.app_state_with(cache.clone(), Arc::new(DbAuditStore::new()));

        let characters = state.orchestrator().get_data().await.unwrap();

        assert_eq!(characters.len(), 2);
        assert_eq!(cache.writes(), 1);

        test.assert_mocks();

        Ok(())
    }

    /// Expect an audit insert failure to leave the result and the cache write intact
    #[tokio::test]
    async fn survives_audit_insert_failure() -> Result<(), TestError> {
        // No audit table: the store is available but every insert fails
        let test = TestBuilder::new()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let cache = Arc::new(MemoryCache::new());
        let state = test.app_state_with(cache.clone(), test.audit_store());

        let characters = state.orchestrator().get_data().await.unwrap();

        assert_eq!(characters.len(), 2);
        assert_eq!(cache.writes(), 1);

        Ok(())
    }

    /// Expect an upstream failure to fail the call and write nothing
    #[tokio::test]
    async fn upstream_failure_writes_nothing() -> Result<(), TestError> {
        let mut test = TestBuilder::new()
            .with_audit_table()
            .with_character_pages(humans(), 0)
            .build()
            .await?;
        test.create_error_endpoint(
            LOCATION_PATH,
            LOCATION_QUERY,
            500,
            TEST_MAX_ATTEMPTS as usize,
        );

        let cache = Arc::new(MemoryCache::new());
        let state = test.app_state_with(cache.clone(), test.audit_store());

        let result = state.orchestrator().get_data().await;

        assert!(matches!(
            result,
            Err(UpstreamError::MaxRetriesReached { .. })
        ));
        assert_eq!(cache.writes(), 0);
        assert_eq!(test.audit_record_count().await?, 0);

        test.assert_mocks();

        Ok(())
    }

    /// Expect an empty list, cached like any other result, when no human is from Earth
    #[tokio::test]
    async fn caches_empty_result() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(
                vec![vec![factory::character(47, "Birdperson", "Bird World")]],
                1,
            )
            .build()
            .await?;

        let cache = Arc::new(MemoryCache::new());
        let state = test.app_state_with(cache.clone(), test.audit_store());

        let characters = state.orchestrator().get_data().await.unwrap();

        assert!(characters.is_empty());
        assert_eq!(cache.entry(CACHE_KEY).await.unwrap().0, "[]");

        test.assert_mocks();

        Ok(())
    }

    /// Expect locations to be resolved before characters, and nothing upstream on a hit
    #[tokio::test]
    async fn resolves_locations_then_characters() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let fetcher = Arc::new(RecordingFetcher::new());
        let mut state = test.into_app_state();
        state.upstream = fetcher.clone();

        state.orchestrator().get_data().await.unwrap();

        let urls = fetcher.urls().await;
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], test.location_url());
        assert_eq!(urls[1], test.character_url());
        assert!(urls[2].starts_with(&format!("{}{}", test.upstream_url(), CHARACTER_PATH)));

        state.orchestrator().get_data().await.unwrap();

        assert_eq!(fetcher.urls().await.len(), 3);

        test.assert_mocks();

        Ok(())
    }

    /// Expect a cache write that never completes to be abandoned after the store timeout
    #[tokio::test]
    async fn abandons_stalled_cache_write() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let state = test.app_state_with(
            Arc::new(StalledCache::new(Stall::Set)),
            test.audit_store(),
        );

        let started = Instant::now();
        let characters = tokio::time::timeout(STALL_GUARD, state.orchestrator().get_data())
            .await
            .expect("stalled cache write held the response")
            .unwrap();

        assert_eq!(names(&characters), vec!["Rick Sanchez", "Beth Smith"]);
        assert!(started.elapsed() >= TEST_STORE_TIMEOUT);
        assert_eq!(test.audit_record_count().await?, 1);

        test.assert_mocks();

        Ok(())
    }

    /// Expect a cache read that never completes to be treated as a miss
    #[tokio::test]
    async fn treats_stalled_cache_read_as_miss() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_audit_table()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let state = test.app_state_with(
            Arc::new(StalledCache::new(Stall::Get)),
            test.audit_store(),
        );

        let characters = tokio::time::timeout(STALL_GUARD, state.orchestrator().get_data())
            .await
            .expect("stalled cache read held the response")
            .unwrap();

        assert_eq!(characters.len(), 2);
        assert_eq!(test.audit_record_count().await?, 1);

        test.assert_mocks();

        Ok(())
    }

    /// Expect an audit insert that never completes to leave the cache write intact
    #[tokio::test]
    async fn abandons_stalled_audit_write() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_location_pages(earth_locations(), 1)
            .with_character_pages(humans(), 1)
            .build()
            .await?;

        let cache = Arc::new(MemoryCache::new());
        let state = test.app_state_with(cache.clone(), Arc::new(StalledAudit));

        let characters = tokio::time::timeout(STALL_GUARD, state.orchestrator().get_data())
            .await
            .expect("stalled audit write held the response")
            .unwrap();

        assert_eq!(characters.len(), 2);
        assert_eq!(cache.writes(), 1);

        test.assert_mocks();

        Ok(())
    }
}
