//! Gemini and Imagen REST envelopes.
//!
//! Only the response side is typed; request bodies are small enough to build
//! with `json!` at the call site.

use serde::{Deserialize, Serialize};

/// URL of a model's `:generateContent` endpoint.
///
/// # Examples
///
/// ```
/// use kitchen_upstream::generate_content_url;
///
/// assert_eq!(
///     generate_content_url("https://host/v1beta/models/", "gemini-2.5-flash"),
///     "https://host/v1beta/models/gemini-2.5-flash:generateContent"
/// );
/// ```
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    format!("{}/{}:generateContent", base_url.trim_end_matches('/'), model)
}

/// URL of a model's `:predict` endpoint.
pub fn predict_url(base_url: &str, model: &str) -> String {
    format!("{}/{}:predict", base_url.trim_end_matches('/'), model)
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type, e.g. `image/png`
    #[serde(default)]
    pub mime_type: String,
    /// Base64 bytes
    #[serde(default)]
    pub data: String,
}

/// One part of a content block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Binary part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// A content block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Ordered parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate content
    #[serde(default)]
    pub content: Option<Content>,
}

/// `:generateContent` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.first_parts().first().and_then(|p| p.text.as_deref())
    }

    /// First part of the first candidate carrying non-empty inline data.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.first_parts()
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
    }
}

/// One Imagen prediction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Base64 image bytes
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    /// MIME type, when reported
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// `:predict` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predictions, one per sample
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

impl PredictResponse {
    /// The first prediction with non-empty image bytes.
    pub fn first_image(&self) -> Option<&Prediction> {
        self.predictions
            .first()
            .filter(|p| p.bytes_base64_encoded.as_deref().is_some_and(|b| !b.is_empty()))
    }
}
