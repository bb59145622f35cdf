use axum::{http::header, response::IntoResponse};

use crate::server::{error::Error, metrics};

/// Expose every registered metric in the Prometheus text format
///
/// Not part of the OpenAPI document.
///
/// # Responses
/// - 200 (OK): Prometheus exposition text
/// - 500 (Internal Server Error): Metrics could not be encoded
pub async fn get_metrics() -> Result<impl IntoResponse, Error> {
    let (content_type, body) = metrics::encode()?;

    Ok(([(header::CONTENT_TYPE, content_type)], body))
}
