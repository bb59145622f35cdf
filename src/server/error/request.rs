use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Client input rejected before any upstream work is done.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),
    #[error("Unknown query parameter: {0}")]
    UnknownQueryParameter(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        tracing::debug!("Rejected request: {}", self);

        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
