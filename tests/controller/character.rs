//! Tests for the get_earth_characters endpoint.

use axum::http::header::RETRY_AFTER;
use earthlings::{model::character::Character, server::service::orchestrator::CACHE_KEY};
use earthlings_test_utils::constant::{LOCATION_PATH, LOCATION_QUERY};

use super::*;
use crate::util::TEST_MAX_ATTEMPTS;

fn rick_and_morty() -> Vec<Vec<Value>> {
    vec![vec![
        factory::character(1, "Rick", "Earth (C-137)"),
        factory::character(2, "Morty", "Earth (C-137)"),
    ]]
}

fn earth() -> Vec<Vec<Value>> {
    vec![vec![factory::location(1, "Earth (C-137)")]]
}

fn response_names(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect()
}

/// Cache already holding Rick then Morty, so requests never go upstream
async fn cached_app(test: &TestContext) -> Router {
    let characters: Vec<Character> = rick_and_morty()
        .remove(0)
        .into_iter()
        .map(|c| serde_json::from_value(c).unwrap())
        .collect();
    let cache = MemoryCache::with_entry(CACHE_KEY, serde_json::to_string(&characters).unwrap())
        .await;

    routes(test.app_state_with(Arc::new(cache), test.audit_store()))
}

/// Expect the upstream order when no sort is requested
#[tokio::test]
async fn returns_characters_in_upstream_order() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_audit_table()
        .with_location_pages(earth(), 1)
        .with_character_pages(rick_and_morty(), 1)
        .build()
        .await?;
    let app = routes(test.into_app_state());

    let response = get(&app, "/earth_characters").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(response_names(&body), vec!["Rick", "Morty"]);

    test.assert_mocks();

    Ok(())
}

/// Expect sort_by=name to order Morty before Rick
#[tokio::test]
async fn sorts_by_name() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_audit_table()
        .with_location_pages(earth(), 1)
        .with_character_pages(rick_and_morty(), 1)
        .build()
        .await?;
    let app = routes(test.into_app_state());

    let response = get(&app, "/earth_characters?sort_by=name").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(response_names(&body), vec!["Morty", "Rick"]);

    test.assert_mocks();

    Ok(())
}

/// Expect records to use the upstream field names
#[tokio::test]
async fn serializes_upstream_field_names() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = cached_app(&test).await;

    let body = json_body(get(&app, "/earth_characters").await).await;
    let rick = &body[0];

    assert_eq!(rick["id"], 1);
    assert_eq!(rick["type"], "");
    assert_eq!(rick["origin"]["name"], "Earth (C-137)");
    assert!(rick["episode"].is_array());
    assert!(rick.get("kind").is_none());

    Ok(())
}

/// Expect 400 for an unknown sort field, without contacting upstream
#[tokio::test]
async fn rejects_invalid_sort_field() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_location_pages(earth(), 0)
        .with_character_pages(rick_and_morty(), 0)
        .build()
        .await?;
    let app = routes(test.into_app_state());

    let response = get(&app, "/earth_characters?sort_by=bogus").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid sort field: bogus");

    test.assert_mocks();

    Ok(())
}

/// Expect 400 for any query parameter other than sort_by
#[tokio::test]
async fn rejects_unknown_query_parameter() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_location_pages(earth(), 0)
        .with_character_pages(rick_and_morty(), 0)
        .build()
        .await?;
    let app = routes(test.into_app_state());

    let response = get(&app, "/earth_characters?x=1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    test.assert_mocks();

    Ok(())
}

/// Expect 500 once upstream retries are exhausted
#[tokio::test]
async fn returns_500_when_upstream_fails() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_audit_table().build().await?;
    test.create_error_endpoint(
        LOCATION_PATH,
        LOCATION_QUERY,
        503,
        TEST_MAX_ATTEMPTS as usize,
    );
    let app = routes(test.into_app_state());

    let response = get(&app, "/earth_characters").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].is_string());

    test.assert_mocks();

    Ok(())
}

/// Expect the sixth rapid request from one client to be throttled with Retry-After
#[tokio::test]
async fn sixth_request_is_rate_limited() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = cached_app(&test).await;

    for _ in 0..5 {
        let response = get(&app, "/earth_characters").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(&app, "/earth_characters").await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    assert_eq!(retry_after, Some(12));

    Ok(())
}

/// Expect rejected requests to consume tokens too, so a 400 counts against the budget
#[tokio::test]
async fn invalid_requests_count_against_limit() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = cached_app(&test).await;

    for _ in 0..5 {
        let response = get(&app, "/earth_characters?sort_by=bogus").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = get(&app, "/earth_characters?sort_by=name").await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    Ok(())
}
