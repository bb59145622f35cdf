use axum::{
    http::{header::RETRY_AFTER, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RateLimitError {
    /// The client's bucket holds less than one token.
    #[error("Rate limit exceeded for {key}, retry after {retry_after} seconds")]
    Exceeded { key: String, retry_after: u64 },
}

impl RateLimitError {
    /// Seconds the client should wait before its next request is admitted
    pub fn retry_after(&self) -> u64 {
        match self {
            Self::Exceeded { retry_after, .. } => *retry_after,
        }
    }
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let retry_after = self.retry_after();

        (
            StatusCode::TOO_MANY_REQUESTS,
            [(RETRY_AFTER, retry_after.to_string())],
            Json(ErrorDto {
                error: format!("Rate limit exceeded, retry after {} seconds", retry_after),
            }),
        )
            .into_response()
    }
}
