//! Client-facing error responses.

use crate::Feature;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kitchen_error::{UpstreamError, UpstreamErrorKind, ValidationError};
use kitchen_rate_limit::RateLimitExceeded;
use serde_json::json;
use tracing::{debug, error};

/// Every error the HTTP surface returns.
///
/// The body is always `{"error": "<message>"}` with a stable message; source
/// locations and upstream bodies stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ApiError {
    /// Rejected client input (400)
    #[display("{}", _0)]
    BadRequest(String),

    /// Body was not valid JSON for the route (400)
    #[display("Invalid JSON body")]
    InvalidJson,

    /// Body exceeded the configured ceiling (413)
    #[display("Request body too large")]
    PayloadTooLarge,

    /// Unknown or expired resource (404)
    #[display("expired or not found")]
    NotFound,

    /// Client quota exhausted (429)
    #[display("Too many requests, please try again later.")]
    RateLimited {
        /// Seconds until the next request is admitted
        retry_after_secs: u64,
    },

    /// No upstream API key configured (500)
    #[display("Missing GEMINI_API_KEY")]
    MissingApiKey,

    /// Upstream unreachable or answered with garbage (500)
    #[display("{}", _0.failure_message())]
    Failed(Feature),

    /// Upstream succeeded without a usable payload (502)
    #[display("{}", _0.empty_message())]
    Empty(Feature),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MissingApiKey | ApiError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Empty(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Map an upstream failure for `feature`, logging the detail.
    pub fn upstream(feature: Feature, err: &UpstreamError) -> Self {
        match err.kind() {
            UpstreamErrorKind::MissingApiKey => ApiError::MissingApiKey,
            _ => {
                error!(%feature, error = %err, "Upstream call failed");
                ApiError::Failed(feature)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        debug!(error = %err, "Rejected request input");
        ApiError::BadRequest(err.public_message())
    }
}

impl From<RateLimitExceeded> for ApiError {
    fn from(err: RateLimitExceeded) -> Self {
        ApiError::RateLimited {
            retry_after_secs: err.retry_after_secs(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::InvalidJson
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        if let ApiError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidJson.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Empty(Feature::Recipe).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::MissingApiKey.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::RateLimited { retry_after_secs: 3 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(ApiError::Failed(Feature::Drinks).to_string(), "Drinks request failed");
        assert_eq!(ApiError::NotFound.to_string(), "expired or not found");
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited { retry_after_secs: 7 }.into_response();
        assert_eq!(response.headers()[header::RETRY_AFTER], "7");
    }

    #[test]
    fn test_upstream_missing_key() {
        let err = UpstreamError::new(UpstreamErrorKind::MissingApiKey);
        assert_eq!(ApiError::upstream(Feature::Vision, &err), ApiError::MissingApiKey);
        let err = UpstreamError::new(UpstreamErrorKind::Transport("reset".into()));
        assert_eq!(ApiError::upstream(Feature::Vision, &err), ApiError::Failed(Feature::Vision));
    }
}
