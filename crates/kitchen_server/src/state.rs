//! Process-wide services shared by every handler.

use crate::{ApiError, ServerConfig};
use derive_getters::Getters;
use kitchen_cache::ImageStore;
use kitchen_error::KitchenResult;
use kitchen_rate_limit::RateLimiter;
use kitchen_security::InputValidator;
use kitchen_upstream::{GeminiClient, Transport};
use std::sync::Arc;
use tracing::warn;

/// Services constructed once at startup and handed to every request.
///
/// Cloning is cheap; clones share the image store and rate-limit state.
#[derive(Debug, Clone, Getters)]
pub struct AppState {
    gemini: GeminiClient,
    limiter: RateLimiter,
    images: ImageStore,
    validator: Arc<InputValidator>,
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Build every service from `config`, sending upstream traffic through `transport`.
    pub fn new(config: ServerConfig, transport: Arc<dyn Transport>) -> KitchenResult<Self> {
        let gemini = GeminiClient::new(transport, config.upstream().clone());
        let limiter = RateLimiter::new(config.rate_limit().clone())?;
        let images = ImageStore::new(config.image_store().clone());
        let validator = Arc::new(InputValidator::new(config.limits().clone()));

        if !gemini.has_api_key() {
            warn!("No upstream API key configured; generation routes will answer 500");
        }

        Ok(Self {
            gemini,
            limiter,
            images,
            validator,
            config: Arc::new(config),
        })
    }

    /// Fail fast when no upstream API key is configured.
    pub fn require_api_key(&self) -> Result<(), ApiError> {
        if self.gemini.has_api_key() {
            Ok(())
        } else {
            Err(ApiError::MissingApiKey)
        }
    }
}
