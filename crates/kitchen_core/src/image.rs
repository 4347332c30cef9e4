//! Generated image payloads.

use derive_getters::Getters;

/// Base64 image bytes plus MIME type, as extracted from a provider response.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GeneratedImage {
    base64: String,
    mime_type: String,
}

impl GeneratedImage {
    /// Create a new generated image.
    pub fn new(base64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Inline `data:` URI suitable for an `<img src>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kitchen_core::GeneratedImage;
    ///
    /// let image = GeneratedImage::new("AAAA", "image/png");
    /// assert_eq!(image.data_uri(), "data:image/png;base64,AAAA");
    /// ```
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}
