//! Sequential image-provider fallback.
//!
//! A [`FallbackChain`] is data: an ordered list of [`ProviderCandidate`]s.
//! Adding, removing or reordering a provider never touches control flow.

use crate::{
    GenerateContentResponse, ImageModel, ModelFamily, PredictResponse, RetryClient,
    UpstreamConfig, UpstreamRequest, generate_content_url, predict_url,
};
use kitchen_core::GeneratedImage;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{info, instrument, warn};

const DEFAULT_IMAGE_MIME: &str = "image/png";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// One provider in an image fallback chain.
pub trait ProviderCandidate: Send + Sync + std::fmt::Debug {
    /// Model identifier, as reported by diagnostics.
    fn model(&self) -> &str;

    /// Diagnostic label, e.g. `imagen:imagen-4.0-generate-001`.
    fn label(&self) -> String;

    /// Build the single-attempt request for `prompt`.
    fn build_request(&self, prompt: &str) -> UpstreamRequest;

    /// Pull an image out of this provider's response shape.
    fn extract(&self, response: &Value) -> Option<GeneratedImage>;
}

/// Endpoint details shared by both candidate kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl Endpoint {
    fn request(&self, url: String, body: Value, label: String) -> UpstreamRequest {
        UpstreamRequest::post(url, body)
            .with_header(API_KEY_HEADER, self.api_key.clone())
            .with_timeout(self.timeout)
            .with_max_attempts(1)
            .with_label(label)
    }
}

/// Imagen `:predict` provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagenCandidate {
    endpoint: Endpoint,
}

impl ImagenCandidate {
    /// Create an Imagen candidate.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: Endpoint {
                base_url: base_url.into(),
                api_key: api_key.into(),
                model: model.into(),
                timeout,
            },
        }
    }
}

impl ProviderCandidate for ImagenCandidate {
    fn model(&self) -> &str {
        &self.endpoint.model
    }

    fn label(&self) -> String {
        format!("imagen:{}", self.endpoint.model)
    }

    fn build_request(&self, prompt: &str) -> UpstreamRequest {
        self.endpoint.request(
            predict_url(&self.endpoint.base_url, &self.endpoint.model),
            json!({
                "instances": [{ "prompt": prompt }],
                "parameters": { "sampleCount": 1 }
            }),
            self.label(),
        )
    }

    fn extract(&self, response: &Value) -> Option<GeneratedImage> {
        let parsed = PredictResponse::deserialize(response).ok()?;
        let prediction = parsed.first_image()?;
        let bytes = prediction.bytes_base64_encoded.as_deref()?;
        let mime = prediction
            .mime_type
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME);
        Some(GeneratedImage::new(bytes, mime))
    }
}

/// Gemini `:generateContent` provider asked for an image modality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiImageCandidate {
    endpoint: Endpoint,
}

impl GeminiImageCandidate {
    /// Create a Gemini image candidate.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: Endpoint {
                base_url: base_url.into(),
                api_key: api_key.into(),
                model: model.into(),
                timeout,
            },
        }
    }
}

impl ProviderCandidate for GeminiImageCandidate {
    fn model(&self) -> &str {
        &self.endpoint.model
    }

    fn label(&self) -> String {
        format!("gemini-image:{}", self.endpoint.model)
    }

    fn build_request(&self, prompt: &str) -> UpstreamRequest {
        self.endpoint.request(
            generate_content_url(&self.endpoint.base_url, &self.endpoint.model),
            json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": { "responseModalities": ["IMAGE"] }
            }),
            self.label(),
        )
    }

    fn extract(&self, response: &Value) -> Option<GeneratedImage> {
        let parsed = GenerateContentResponse::deserialize(response).ok()?;
        let data = parsed.first_inline_data()?;
        let mime = if data.mime_type.is_empty() {
            DEFAULT_IMAGE_MIME
        } else {
            data.mime_type.as_str()
        };
        Some(GeneratedImage::new(data.data.as_str(), mime))
    }
}

/// The candidate that produced the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackWinner {
    /// Model that answered
    pub model: String,
    /// The image it produced
    pub image: GeneratedImage,
}

/// Outcome of a diagnostics probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailure {
    /// No HTTP response was received
    NetworkError,
}

/// HTTP status of a probe, or the reason there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbeStatus {
    /// Received status code
    Http(u16),
    /// Network failure or timeout
    Failed(ProbeFailure),
}

/// Reachability of one image model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Model identifier
    pub model: String,
    /// Status code or `"network_error"`
    pub status: ProbeStatus,
    /// Whether the status was 2xx
    pub ok: bool,
    /// Failure detail for network errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ordered image providers, tried strictly one after another.
#[derive(Debug, Default)]
pub struct FallbackChain {
    candidates: Vec<Box<dyn ProviderCandidate>>,
}

impl FallbackChain {
    /// Chain over explicit candidates.
    pub fn new(candidates: Vec<Box<dyn ProviderCandidate>>) -> Self {
        Self { candidates }
    }

    /// Chain in the order of `config.image_models()`.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        let candidates = config
            .image_models()
            .iter()
            .map(|entry: &ImageModel| -> Box<dyn ProviderCandidate> {
                match entry.family() {
                    ModelFamily::Imagen => Box::new(ImagenCandidate::new(
                        config.base_url(),
                        config.api_key(),
                        entry.model(),
                        config.image_timeout(),
                    )),
                    ModelFamily::Gemini => Box::new(GeminiImageCandidate::new(
                        config.base_url(),
                        config.api_key(),
                        entry.model(),
                        config.image_timeout(),
                    )),
                }
            })
            .collect();
        Self { candidates }
    }

    /// Candidates in trial order.
    pub fn candidates(&self) -> &[Box<dyn ProviderCandidate>] {
        &self.candidates
    }

    /// Try each candidate once, in order, and return the first image.
    ///
    /// Failures, timeouts and empty payloads move on to the next candidate.
    /// Exhausting the chain yields `None`; it is never an error.
    #[instrument(skip(self, retry, prompt), fields(candidates = self.candidates.len()))]
    pub async fn run(&self, retry: &RetryClient, prompt: &str) -> Option<FallbackWinner> {
        for candidate in &self.candidates {
            let request = candidate.build_request(prompt);
            match retry.execute(&request).await {
                Ok(Some(body)) => match candidate.extract(&body) {
                    Some(image) => {
                        info!(model = candidate.model(), "Image provider succeeded");
                        return Some(FallbackWinner {
                            model: candidate.model().to_string(),
                            image,
                        });
                    }
                    None => warn!(model = candidate.model(), "Image provider returned no image"),
                },
                Ok(None) => warn!(model = candidate.model(), "Image provider rejected request"),
                Err(e) => warn!(model = candidate.model(), error = %e, "Image provider failed"),
            }
        }
        warn!("All image providers exhausted");
        None
    }

    /// Send one request per candidate and report reachability.
    #[instrument(skip(self, retry, prompt))]
    pub async fn probe(&self, retry: &RetryClient, prompt: &str) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            let request = candidate.build_request(prompt);
            let result = match retry.probe(&request).await {
                Ok(status) => ProbeResult {
                    model: candidate.model().to_string(),
                    status: ProbeStatus::Http(status),
                    ok: (200..300).contains(&status),
                    error: None,
                },
                Err(e) => ProbeResult {
                    model: candidate.model().to_string(),
                    status: ProbeStatus::Failed(ProbeFailure::NetworkError),
                    ok: false,
                    error: Some(e.kind().to_string()),
                },
            };
            results.push(result);
        }
        info!(?results, "Image model diagnostics");
        results
    }
}
