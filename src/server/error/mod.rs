//! Error types for the earthlings server.
//!
//! Each failure domain gets its own `thiserror` enum (configuration, upstream API, request
//! validation, rate limiting, cache and audit stores). They are aggregated into [`Error`],
//! which implements `IntoResponse` so handlers can return it directly with `?`.

pub mod config;
pub mod rate_limit;
pub mod request;
pub mod store;
pub mod upstream;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        config::ConfigError,
        rate_limit::RateLimitError,
        request::RequestError,
        store::{AuditError, CacheError},
        upstream::UpstreamError,
    },
};

/// Main error type for the earthlings server.
///
/// Domain errors convert into this type with `?`. The `IntoResponse` implementation decides
/// which of them are client errors and which are reported as internal failures.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (malformed environment variable).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Upstream API could not be resolved (retries exhausted or malformed pages).
    #[error(transparent)]
    UpstreamError(#[from] UpstreamError),
    /// Client sent a request the API does not accept.
    #[error(transparent)]
    RequestError(#[from] RequestError),
    /// Client exceeded its request budget.
    #[error(transparent)]
    RateLimitError(#[from] RateLimitError),
    /// Cache store failure. Only surfaces outside the data path (e.g. startup).
    #[error(transparent)]
    CacheError(#[from] CacheError),
    /// Audit store failure. Only surfaces outside the data path (e.g. startup).
    #[error(transparent)]
    AuditError(#[from] AuditError),
    /// Database error (connection issues, migrations, query failures).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Redis/Valkey client error.
    #[error(transparent)]
    RedisError(#[from] fred::error::Error),
    /// HTTP client construction error.
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// Metrics could not be registered or encoded.
    #[error(transparent)]
    MetricsError(#[from] prometheus::Error),
    /// Socket or filesystem error.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - Invalid sort field or unknown query parameter
/// - 429 Too Many Requests - Rate limit exceeded, with a `Retry-After` header
/// - 500 Internal Server Error - Everything else (logged)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::RequestError(err) => err.into_response(),
            Self::RateLimitError(err) => err.into_response(),
            Self::UpstreamError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// The error is logged in full, but the client only receives a generic message so internal
/// details such as upstream URLs or database errors are not leaked.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
