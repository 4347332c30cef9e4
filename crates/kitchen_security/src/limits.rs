//! Size and length ceilings for client input.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// MIME types accepted for vision uploads.
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Ceilings applied by [`InputValidator`](crate::InputValidator).
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct InputLimits {
    /// Maximum number of ingredients per request
    #[serde(default = "default_max_ingredients")]
    max_ingredients: usize,

    /// Maximum characters kept per ingredient
    #[serde(default = "default_max_ingredient_chars")]
    max_ingredient_chars: usize,

    /// Maximum characters in a recipe title
    #[serde(default = "default_max_title_chars")]
    max_title_chars: usize,

    /// Maximum characters kept from a free-text prompt
    #[serde(default = "default_max_prompt_chars")]
    max_prompt_chars: usize,

    /// Maximum characters kept from a diet label
    #[serde(default = "default_max_diet_chars")]
    max_diet_chars: usize,

    /// Maximum encoded length of a base64 image
    #[serde(default = "default_max_image_base64_len")]
    max_image_base64_len: usize,
}

fn default_max_ingredients() -> usize {
    50
}

fn default_max_ingredient_chars() -> usize {
    100
}

fn default_max_title_chars() -> usize {
    200
}

fn default_max_prompt_chars() -> usize {
    500
}

fn default_max_diet_chars() -> usize {
    30
}

fn default_max_image_base64_len() -> usize {
    16 * 1024 * 1024
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_ingredients: default_max_ingredients(),
            max_ingredient_chars: default_max_ingredient_chars(),
            max_title_chars: default_max_title_chars(),
            max_prompt_chars: default_max_prompt_chars(),
            max_diet_chars: default_max_diet_chars(),
            max_image_base64_len: default_max_image_base64_len(),
        }
    }
}
