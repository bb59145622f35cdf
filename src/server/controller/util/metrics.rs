use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::server::metrics;

/// Label used for requests that matched no route
pub const UNMATCHED_HANDLER: &str = "unmatched";

/// Count every request and observe its latency, labelled by route template.
///
/// The matched route is used instead of the raw path so unknown URLs cannot grow the label set.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let handler = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_HANDLER.to_string());

    let response = next.run(request).await;

    if let Some(metrics) = metrics::metrics() {
        metrics.record_http_request(
            method.as_str(),
            &handler,
            response.status().as_u16(),
            start.elapsed().as_secs_f64(),
        );
    }

    response
}
