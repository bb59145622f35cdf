//! Tests for the healthcheck endpoint.

use std::time::Duration;

use earthlings::server::data::DbAuditStore;

use super::*;
use crate::util::{Stall, StalledCache};

/// Expect every flag to be true when both stores are up
#[tokio::test]
async fn reports_available_stores() -> Result<(), TestError> {
    let test = TestBuilder::new().with_audit_table().build().await?;
    let app = routes(test.into_app_state());

    let response = get(&app, "/healthcheck").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        serde_json::json!({
            "cacheAvailable": true,
            "cacheReady": true,
            "dbAvailable": true,
        })
    );

    Ok(())
}

/// Expect 200 with every flag false when neither store is up
#[tokio::test]
async fn reports_unavailable_stores() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = routes(test.app_state_with(
        Arc::new(MemoryCache::unavailable()),
        Arc::new(DbAuditStore::new()),
    ));

    let response = get(&app, "/healthcheck").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["cacheAvailable"], false);
    assert_eq!(body["cacheReady"], false);
    assert_eq!(body["dbAvailable"], false);

    Ok(())
}

/// Expect the health endpoint to be exempt from rate limiting
#[tokio::test]
async fn is_not_rate_limited() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = routes(test.into_app_state());

    for _ in 0..10 {
        assert_eq!(get(&app, "/healthcheck").await.status(), StatusCode::OK);
    }

    Ok(())
}

/// Expect 404 for unknown paths
#[tokio::test]
async fn unknown_path_is_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = routes(test.into_app_state());

    assert_eq!(get(&app, "/nowhere").await.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect a cache ping that never answers to report not ready after the store timeout
#[tokio::test]
async fn reports_stalled_cache_as_not_ready() -> Result<(), TestError> {
    let test = TestBuilder::new().with_audit_table().build().await?;
    let app = routes(test.app_state_with(
        Arc::new(StalledCache::new(Stall::Ping)),
        test.audit_store(),
    ));

    let response = tokio::time::timeout(Duration::from_secs(5), get(&app, "/healthcheck"))
        .await
        .expect("stalled cache ping held the response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["cacheAvailable"], true);
    assert_eq!(body["cacheReady"], false);
    assert_eq!(body["dbAvailable"], true);

    Ok(())
}
