//! Rate-limit gate applied before any route handler runs.

use crate::{ApiError, AppState};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kitchen_rate_limit::RouteGroup;
use std::net::SocketAddr;

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// Route group a path is counted against; `None` is not limited.
pub fn route_group(path: &str) -> Option<RouteGroup> {
    match path {
        "/api/health" => None,
        "/api/image" | "/api/image-diagnostics" => Some(RouteGroup::Image),
        _ => Some(RouteGroup::Standard),
    }
}

/// Client identity: the first `X-Forwarded-For` entry, else the TCP peer.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Count the request against its route group and refuse it with 429 when
/// the client's quota is exhausted.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(group) = route_group(request.uri().path()) else {
        return next.run(request).await;
    };

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(request.headers(), peer);

    match state.limiter().check(group, &client) {
        Ok(()) => next.run(request).await,
        Err(exceeded) => ApiError::from(exceeded).into_response(),
    }
}
