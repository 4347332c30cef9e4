//! Image generation, retrieval and diagnostics.

use crate::{ApiError, AppState, Feature, prompts};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kitchen_upstream::ProbeResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Body of `POST /api/image`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    recipe_title: Option<String>,
    prompt: Option<String>,
}

/// Inline image plus a short-lived URL. Both are `null` when no model produced an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    image_base64: Option<String>,
    image_url: Option<String>,
}

/// Reachability of every configured image model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticsResponse {
    results: Vec<ProbeResult>,
}

/// `<scheme>://<host>` as seen by the client.
fn public_origin(headers: &HeaderMap) -> String {
    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{}://{}", scheme, host)
}

/// `POST /api/image`
///
/// Tries the configured image models in order. Exhausting them is not an
/// error: the client receives nulls and renders without a photo.
pub async fn image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ImageBody>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    state.require_api_key()?;
    let Json(body) = body?;
    let subject = state
        .validator()
        .image_subject(body.recipe_title.as_deref(), body.prompt.as_deref())?;

    let winner = state
        .gemini()
        .generate_image(&prompts::image(&subject))
        .await
        .map_err(|e| ApiError::upstream(Feature::Image, &e))?;

    let Some(winner) = winner else {
        info!("No image model produced an image");
        return Ok(Json(ImageResponse {
            image_base64: None,
            image_url: None,
        }));
    };

    let image_url = match STANDARD.decode(winner.image.base64()) {
        Ok(bytes) => {
            let id = state.images().put(bytes, winner.image.mime_type().as_str());
            Some(format!("{}/api/image/{}", public_origin(&headers), id))
        }
        Err(e) => {
            warn!(model = %winner.model, error = %e, "Image payload is not valid base64; skipping store");
            None
        }
    };

    Ok(Json(ImageResponse {
        image_base64: Some(winner.image.data_uri()),
        image_url,
    }))
}

/// `GET /api/image/:id`
pub async fn image_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(stored) = state.images().get(&id) else {
        debug!(%id, "Image expired or never stored");
        return Err(ApiError::NotFound);
    };

    let cache_control = format!("public, max-age={}", state.images().ttl().as_secs());
    Ok((
        [
            (header::CONTENT_TYPE, stored.mime_type().clone()),
            (header::CACHE_CONTROL, cache_control),
        ],
        stored.bytes().clone(),
    )
        .into_response())
}

/// `GET /api/image-diagnostics`
pub async fn image_diagnostics(
    State(state): State<AppState>,
) -> Result<Json<DiagnosticsResponse>, ApiError> {
    state.require_api_key()?;
    let results = state
        .gemini()
        .probe_image_models(prompts::DIAGNOSTIC_PROMPT)
        .await
        .map_err(|e| ApiError::upstream(Feature::Image, &e))?;
    Ok(Json(DiagnosticsResponse { results }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_public_origin_from_proxy_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("chef.example"));
        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("https, http"));
        assert_eq!(public_origin(&headers), "https://chef.example");
    }

    #[test]
    fn test_public_origin_defaults() {
        assert_eq!(public_origin(&HeaderMap::new()), "http://localhost");
    }
}
