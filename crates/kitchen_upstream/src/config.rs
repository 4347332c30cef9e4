//! Upstream endpoint, timeout and model configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request/response shape an image model speaks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelFamily {
    /// `:predict` endpoint returning `predictions[].bytesBase64Encoded`
    Imagen,
    /// `:generateContent` endpoint returning `inlineData` parts
    Gemini,
}

/// One entry of the image fallback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImageModel {
    family: ModelFamily,
    model: String,
}

impl ImageModel {
    /// Create an image model entry.
    pub fn new(family: ModelFamily, model: impl Into<String>) -> Self {
        Self {
            family,
            model: model.into(),
        }
    }
}

/// Generative API settings.
///
/// ```toml
/// [upstream]
/// base_url = "https://generativelanguage.googleapis.com/v1beta/models"
/// text_model = "gemini-2.5-flash"
/// image_models = [
///   { family = "imagen", model = "imagen-4.0-fast-generate-001" },
///   { family = "gemini", model = "gemini-2.5-flash-image" },
/// ]
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct UpstreamConfig {
    /// Models endpoint root
    #[serde(default = "default_base_url")]
    #[setters(into)]
    base_url: String,
    /// API key; empty means unconfigured
    #[serde(default)]
    #[setters(into)]
    api_key: String,
    /// Model used for all text and vision calls
    #[serde(default = "default_text_model")]
    #[setters(into)]
    text_model: String,
    /// Per-attempt deadline for text calls (seconds)
    #[serde(default = "default_text_timeout_secs")]
    text_timeout_secs: u64,
    /// Per-attempt deadline for image calls (seconds)
    #[serde(default = "default_image_timeout_secs")]
    image_timeout_secs: u64,
    /// Attempt ceiling for text calls
    #[serde(default = "default_max_attempts")]
    max_attempts: usize,
    /// First backoff delay (milliseconds)
    #[serde(default = "default_base_delay_ms")]
    base_delay_ms: u64,
    /// Backoff ceiling (milliseconds)
    #[serde(default = "default_max_delay_ms")]
    max_delay_ms: u64,
    /// Image models in the order they are tried
    #[serde(default = "default_image_models")]
    image_models: Vec<ImageModel>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_text_timeout_secs() -> u64 {
    60
}

fn default_image_timeout_secs() -> u64 {
    15
}

fn default_max_attempts() -> usize {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_image_models() -> Vec<ImageModel> {
    vec![
        ImageModel::new(ModelFamily::Imagen, "imagen-4.0-fast-generate-001"),
        ImageModel::new(ModelFamily::Imagen, "imagen-4.0-generate-001"),
        ImageModel::new(ModelFamily::Imagen, "imagen-4.0-ultra-generate-001"),
        ImageModel::new(ModelFamily::Gemini, "gemini-2.5-flash-image"),
    ]
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            text_model: default_text_model(),
            text_timeout_secs: default_text_timeout_secs(),
            image_timeout_secs: default_image_timeout_secs(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            image_models: default_image_models(),
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("text_model", &self.text_model)
            .field("text_timeout_secs", &self.text_timeout_secs)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("base_delay_ms", &self.base_delay_ms)
            .field("max_delay_ms", &self.max_delay_ms)
            .field("image_models", &self.image_models)
            .finish()
    }
}

impl UpstreamConfig {
    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Text call deadline.
    pub fn text_timeout(&self) -> Duration {
        Duration::from_secs(self.text_timeout_secs)
    }

    /// Image call deadline.
    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }

    /// First backoff delay.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Backoff ceiling.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}
