//! Request field validation.

use crate::{ALLOWED_IMAGE_MIME_TYPES, InputLimits, sanitize_text, truncate_chars};
use derive_getters::Getters;
use kitchen_error::{ValidationError, ValidationErrorKind, ValidationResult};
use serde_json::Value;
use tracing::{debug, instrument};

const DEFAULT_DIET: &str = "none";

/// A validated vision upload.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ImageUpload {
    base64: String,
    mime_type: String,
}

/// What an image request asked to depict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSubject {
    /// Caller-supplied free-text prompt, sanitized and truncated
    Prompt(String),
    /// Recipe title to build a food-photography prompt around
    Title(String),
}

/// Validates and cleans request fields against [`InputLimits`].
#[derive(Debug, Clone, Default, Getters)]
pub struct InputValidator {
    limits: InputLimits,
}

impl InputValidator {
    /// Create a validator with custom limits.
    pub fn new(limits: InputLimits) -> Self {
        Self { limits }
    }

    /// Validate an ingredient list.
    ///
    /// Rejects a missing, non-array, empty or oversized list. Each string item
    /// is sanitized and truncated; non-string and blank items are dropped. A
    /// list with nothing left is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use kitchen_security::InputValidator;
    /// use serde_json::json;
    ///
    /// let validator = InputValidator::default();
    /// let items = validator.ingredients(Some(&json!([" Tomato ", "", "Basil"]))).unwrap();
    /// assert_eq!(items, vec!["Tomato", "Basil"]);
    ///
    /// assert!(validator.ingredients(Some(&json!("Tomato"))).is_err());
    /// ```
    #[instrument(skip_all)]
    pub fn ingredients(&self, raw: Option<&Value>) -> ValidationResult<Vec<String>> {
        let missing = || ValidationError::new(ValidationErrorKind::MissingList("ingredients".into()));

        let items = match raw {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(missing()),
        };

        let max = *self.limits.max_ingredients();
        if items.len() > max {
            debug!(count = items.len(), max, "Ingredient list too long");
            return Err(ValidationError::new(ValidationErrorKind::TooMany {
                field: "ingredients".into(),
                max,
            }));
        }

        let cleaned: Vec<String> = items
            .iter()
            .filter_map(Value::as_str)
            .map(|item| self.clip(item, *self.limits.max_ingredient_chars()))
            .filter(|item| !item.is_empty())
            .collect();

        if cleaned.is_empty() {
            return Err(missing());
        }
        Ok(cleaned)
    }

    /// Validate a dish title: required, at most `max_title_chars` after sanitization.
    #[instrument(skip_all)]
    pub fn title(&self, raw: Option<&str>) -> ValidationResult<String> {
        let title = raw.map(sanitize_text).unwrap_or_default();
        if title.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Missing("title".into())));
        }
        self.bounded_title(title, "title")
    }

    /// Sanitize and truncate a free-text prompt. Never fails.
    pub fn prompt(&self, raw: Option<&str>) -> String {
        raw.map(|p| self.clip(p, *self.limits.max_prompt_chars()))
            .unwrap_or_default()
    }

    /// Sanitize and truncate a diet label, defaulting to `"none"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kitchen_security::InputValidator;
    ///
    /// let validator = InputValidator::default();
    /// assert_eq!(validator.diet(None), "none");
    /// assert_eq!(validator.diet(Some("  vegan ")), "vegan");
    /// ```
    pub fn diet(&self, raw: Option<&str>) -> String {
        let diet = raw
            .map(|d| self.clip(d, *self.limits.max_diet_chars()))
            .unwrap_or_default();
        if diet.is_empty() {
            DEFAULT_DIET.to_string()
        } else {
            diet
        }
    }

    /// Validate a base64 image upload and its declared MIME type.
    #[instrument(skip_all, fields(mime_type = ?mime_type))]
    pub fn image(&self, base64: Option<&str>, mime_type: Option<&str>) -> ValidationResult<ImageUpload> {
        let base64 = base64.map(str::trim).unwrap_or_default();
        let mime_type = mime_type
            .map(|m| sanitize_text(m).to_ascii_lowercase())
            .unwrap_or_default();
        if base64.is_empty() || mime_type.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::MissingImage));
        }

        let max = *self.limits.max_image_base64_len();
        if base64.len() > max {
            debug!(len = base64.len(), max, "Image payload too large");
            return Err(ValidationError::new(ValidationErrorKind::TooLong {
                field: "imageBase64".into(),
                max,
            }));
        }

        if !ALLOWED_IMAGE_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(ValidationError::new(ValidationErrorKind::UnsupportedMime(mime_type)));
        }

        Ok(ImageUpload {
            base64: base64.to_string(),
            mime_type,
        })
    }

    /// Decide what an image request depicts.
    ///
    /// A non-blank prompt wins over the recipe title. Neither present is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use kitchen_security::{ImageSubject, InputValidator};
    ///
    /// let validator = InputValidator::default();
    /// assert_eq!(
    ///     validator.image_subject(Some("Pasta"), Some("  ")).unwrap(),
    ///     ImageSubject::Title("Pasta".to_string())
    /// );
    /// assert!(validator.image_subject(None, None).is_err());
    /// ```
    #[instrument(skip_all)]
    pub fn image_subject(
        &self,
        recipe_title: Option<&str>,
        prompt: Option<&str>,
    ) -> ValidationResult<ImageSubject> {
        let prompt = self.prompt(prompt);
        if !prompt.is_empty() {
            return Ok(ImageSubject::Prompt(prompt));
        }

        let title = recipe_title.map(sanitize_text).unwrap_or_default();
        if title.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::MissingPrompt));
        }
        self.bounded_title(title, "recipeTitle").map(ImageSubject::Title)
    }

    fn bounded_title(&self, title: String, field: &str) -> ValidationResult<String> {
        let max = *self.limits.max_title_chars();
        if title.chars().count() > max {
            debug!(field, max, "Title too long");
            return Err(ValidationError::new(ValidationErrorKind::TooLong {
                field: field.into(),
                max,
            }));
        }
        Ok(title)
    }

    fn clip(&self, raw: &str, max: usize) -> String {
        truncate_chars(&sanitize_text(raw), max).trim_end().to_string()
    }
}
