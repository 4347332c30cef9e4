//! Target language for generated text.

use serde::{Deserialize, Serialize};

/// Output language requested by the client.
///
/// Only Russian is recognised explicitly; every other code falls back to English.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// English (default)
    #[default]
    En,
    /// Russian
    Ru,
}

impl Language {
    /// Parse a client-supplied language code, defaulting to English.
    ///
    /// # Examples
    ///
    /// ```
    /// use kitchen_core::Language;
    ///
    /// assert_eq!(Language::from_code(Some("ru")), Language::Ru);
    /// assert_eq!(Language::from_code(Some("de")), Language::En);
    /// assert_eq!(Language::from_code(None), Language::En);
    /// ```
    pub fn from_code(code: Option<&str>) -> Self {
        code.and_then(|c| c.parse().ok()).unwrap_or_default()
    }

    /// Name used inside prompts.
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ru => "Russian",
        }
    }
}
