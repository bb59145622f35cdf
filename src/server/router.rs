//! HTTP routing and OpenAPI documentation configuration.
//!
//! This module defines the application's HTTP routes and generates OpenAPI documentation
//! using utoipa. All API endpoints are registered here with their OpenAPI specifications,
//! and Swagger UI is configured to provide interactive API documentation at `/api/docs`.

use axum::{middleware, routing::get, Router};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        self,
        util::{metrics::track_metrics, rate_limit::rate_limit},
    },
    model::app::AppState,
};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// # Registered Endpoints
/// - `GET /earth_characters` - Earth characters, optionally sorted (rate limited per client)
/// - `GET /healthcheck` - Availability of the cache and the audit database
/// - `GET /metrics` - Prometheus scrape endpoint, left out of the OpenAPI document
///
/// The rate limiter is attached as a route layer of the character endpoint only, so health
/// checks, scrapes and the documentation are never throttled. Request metrics are recorded
/// for every route.
///
/// # Swagger UI
/// Interactive API documentation is served at `/api/docs`, the OpenAPI specification at
/// `/api/docs/openapi.json`.
///
/// # Example
/// ```ignore
/// let app = routes(app_state);
/// axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
/// ```
pub fn routes(state: AppState) -> Router {
    #[derive(OpenApi)]
    #[openapi(info(title = "Earthlings", description = "Earthlings API"), tags(
        (name = controller::character::CHARACTER_TAG, description = "Earth character routes"),
        (name = controller::health::HEALTH_TAG, description = "Service health routes"),
    ))]
    struct ApiDoc;

    let limited = OpenApiRouter::new()
        .routes(routes!(controller::character::get_earth_characters))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(limited)
        .routes(routes!(controller::health::healthcheck))
        .split_for_parts();

    routes
        .route("/metrics", get(controller::metrics::get_metrics))
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(middleware::from_fn(track_metrics))
        .with_state(state)
}
