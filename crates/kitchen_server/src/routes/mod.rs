//! HTTP routes.

mod generate;
mod health;
mod image;

pub use generate::{drinks, meal_plan, recipe, recipe_detail, recipes, vision};
pub use health::health;
pub use image::{image, image_by_id, image_diagnostics};

use crate::{AppState, rate_limit};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build the application router over `state`.
///
/// Layers, outermost first: request tracing, CORS, gzip compression, body
/// size limit, then the rate-limit gate.
pub fn router(state: AppState) -> Router {
    let body_limit = *state.config().server().body_limit_bytes();
    let cors = cors_layer(state.config().server().cors_origin());

    Router::new()
        .route("/api/health", get(health))
        .route("/api/vision", post(vision))
        .route("/api/recipe", post(recipe))
        .route("/api/recipes", post(recipes))
        .route("/api/recipe-detail", post(recipe_detail))
        .route("/api/meal-plan", post(meal_plan))
        .route("/api/drinks", post(drinks))
        .route("/api/image", post(image))
        .route("/api/image/:id", get(image_by_id))
        .route("/api/image-diagnostics", get(image_diagnostics))
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for `origins`: empty allows none, `*` allows any, otherwise a
/// comma-separated allow-list.
pub fn cors_layer(origins: &str) -> CorsLayer {
    let origins = origins.trim();
    if origins.is_empty() {
        return CorsLayer::new();
    }
    if origins == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
