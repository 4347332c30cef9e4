//! Facade over text generation, image fallback and diagnostics.

use crate::{
    FallbackChain, FallbackWinner, GenerateContentResponse, InlineData, ProbeResult, RetryClient,
    Transport, UpstreamConfig, UpstreamRequest, generate_content_url,
};
use derive_getters::Getters;
use kitchen_error::{UpstreamError, UpstreamErrorKind, UpstreamResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A JSON-mode text generation call.
///
/// # Examples
///
/// ```
/// use kitchen_upstream::TextRequest;
///
/// let request = TextRequest::new("Ingredients: Tomato, Basil")
///     .with_system_instruction("Michelin Chef. Respond ONLY with JSON.");
/// assert_eq!(request.prompt(), "Ingredients: Tomato, Basil");
/// assert!(request.system_instruction().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TextRequest {
    prompt: String,
    system_instruction: Option<String>,
    inline_image: Option<InlineData>,
}

impl TextRequest {
    /// A request with a single user text part.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            inline_image: None,
        }
    }

    /// Attach a system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Attach an image after the text part.
    pub fn with_inline_image(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.inline_image = Some(InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        });
        self
    }

    fn to_body(&self) -> Value {
        let mut parts = vec![json!({ "text": self.prompt })];
        if let Some(image) = &self.inline_image {
            parts.push(json!({
                "inlineData": { "mimeType": image.mime_type, "data": image.data }
            }));
        }

        let mut body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        if let (Some(instruction), Some(map)) = (&self.system_instruction, body.as_object_mut()) {
            map.insert(
                "systemInstruction".to_string(),
                json!({ "parts": [{ "text": instruction }] }),
            );
        }
        body
    }
}

/// Client for the generative API used by the request handlers.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    retry: RetryClient,
    chain: Arc<FallbackChain>,
    config: Arc<UpstreamConfig>,
}

impl GeminiClient {
    /// Build a client over `transport`.
    pub fn new(transport: Arc<dyn Transport>, config: UpstreamConfig) -> Self {
        let retry = RetryClient::new(transport, config.base_delay(), config.max_delay());
        let chain = Arc::new(FallbackChain::from_config(&config));
        debug!(?config, "Created Gemini client");
        Self {
            retry,
            chain,
            config: Arc::new(config),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    fn require_api_key(&self) -> UpstreamResult<()> {
        if self.has_api_key() {
            Ok(())
        } else {
            Err(UpstreamError::new(UpstreamErrorKind::MissingApiKey))
        }
    }

    /// Run a text generation and return the first candidate's text.
    ///
    /// Returns an empty string when the upstream rejected the request, ran
    /// out of retries on a transient status, or answered without text.
    /// Network failure on the last attempt is an error.
    #[instrument(skip(self, request), fields(model = %self.config.text_model()))]
    pub async fn generate_text(&self, label: &str, request: &TextRequest) -> UpstreamResult<String> {
        self.require_api_key()?;

        let upstream = UpstreamRequest::post(
            generate_content_url(self.config.base_url(), self.config.text_model()),
            request.to_body(),
        )
        .with_header("x-goog-api-key", self.config.api_key().clone())
        .with_timeout(self.config.text_timeout())
        .with_max_attempts(*self.config.max_attempts())
        .with_label(label);

        let Some(body) = self.retry.execute(&upstream).await? else {
            return Ok(String::new());
        };
        let parsed = GenerateContentResponse::deserialize(&body)
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::Decode(e.to_string())))?;
        let text = parsed.first_text().unwrap_or_default().to_string();
        debug!(chars = text.len(), "Generated text");
        Ok(text)
    }

    /// Generate an image through the fallback chain.
    ///
    /// `Ok(None)` means every provider failed.
    #[instrument(skip(self, prompt))]
    pub async fn generate_image(&self, prompt: &str) -> UpstreamResult<Option<FallbackWinner>> {
        self.require_api_key()?;
        Ok(self.chain.run(&self.retry, prompt).await)
    }

    /// Probe every configured image model once.
    #[instrument(skip(self, prompt))]
    pub async fn probe_image_models(&self, prompt: &str) -> UpstreamResult<Vec<ProbeResult>> {
        self.require_api_key()?;
        Ok(self.chain.probe(&self.retry, prompt).await)
    }
}
