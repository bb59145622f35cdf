use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::server::{error::Error, model::app::AppState};

/// Key used for clients whose address is unknown
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Admit the request or reject it with 429 before the handler runs.
///
/// Clients are keyed by peer IP address. When the server was not started with connect info
/// every request shares the [`UNKNOWN_CLIENT`] bucket.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    let key = client_key(&request);

    state.rate_limiter.check(&key).await?;

    Ok(next.run(request).await)
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
