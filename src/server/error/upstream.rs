//! Upstream API error types.
//!
//! An `UpstreamError` is fatal to the request that triggered it: the character list cannot be
//! computed without both the Earth locations and the full character listing.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum UpstreamError {
    /// A single attempt failed at the transport level, timed out, or returned a non-2xx status.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The body of a response was not JSON.
    #[error("Response from {url} is not valid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Every attempt failed; carries the last attempt's error message.
    #[error("max retries reached: {attempts} attempts to {url} failed, last error: {last_error}")]
    MaxRetriesReached {
        url: String,
        attempts: u32,
        last_error: String,
    },
    /// A page was valid JSON but did not have the `{info, results}` shape.
    #[error("Malformed page from {url}: {source}")]
    MalformedPage {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// A page URL could not be built from the first page URL.
    #[error("Invalid upstream URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        tracing::error!("Upstream resolution failed: {}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Upstream API is unavailable, please try again later".to_string(),
            }),
        )
            .into_response()
    }
}
