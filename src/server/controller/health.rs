use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{model::api::HealthDto, server::model::app::AppState};

/// OpenAPI tag of the health routes
pub static HEALTH_TAG: &str = "health";

/// Report the state of the cache and the audit database
///
/// Always answers 200: both stores are optional and their loss only degrades the service.
///
/// # Responses
/// - 200 (OK): `cacheAvailable` and `dbAvailable` reflect initialisation, `cacheReady` a live ping
///   answered within the store timeout
#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Availability of the optional stores", body = HealthDto),
    ),
)]
pub async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    let cache_ready = tokio::time::timeout(state.store_timeout, state.cache.ping())
        .await
        .unwrap_or_else(|_| {
            tracing::warn!("Cache ping timed out after {:?}", state.store_timeout);
            false
        });

    let health = HealthDto {
        cache_available: state.cache.is_available(),
        cache_ready,
        db_available: state.audit.is_available(),
    };

    (StatusCode::OK, Json(health))
}
