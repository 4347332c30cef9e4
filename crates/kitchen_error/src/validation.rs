//! Validation error types.

/// Rejected client input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// A required field is absent or empty after sanitization
    #[display("{} is required", _0)]
    Missing(String),
    /// A required list is absent, not a list, or empty after sanitization
    #[display("{} are required", _0)]
    MissingList(String),
    /// Vision upload lacks its payload or MIME type
    #[display("imageBase64 and mimeType are required")]
    MissingImage,
    /// Image request has neither a title nor a prompt
    #[display("recipeTitle or prompt is required")]
    MissingPrompt,
    /// A list holds more items than allowed
    #[display("Max {} {} allowed", max, field)]
    TooMany {
        /// Field name
        field: String,
        /// Ceiling
        max: usize,
    },
    /// A string or payload exceeds its length ceiling
    #[display("{} exceeds {} characters", field, max)]
    TooLong {
        /// Field name
        field: String,
        /// Ceiling
        max: usize,
    },
    /// MIME type outside the allow-list
    #[display("Unsupported image format: {}", _0)]
    UnsupportedMime(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use kitchen_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::Missing("title".to_string()));
/// assert_eq!(err.kind.to_string(), "title is required");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific error kind
    pub kind: ValidationErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }

    /// Client-facing message, free of source locations.
    pub fn public_message(&self) -> String {
        self.kind.to_string()
    }
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
