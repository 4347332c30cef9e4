//! Top-level error wrapper types.

use crate::{ConfigError, JsonError, ServerError, UpstreamError, ValidationError};

/// Every error the Kitchen crates can surface.
///
/// # Examples
///
/// ```
/// use kitchen_error::{KitchenError, JsonError};
///
/// let json_err = JsonError::new("Unexpected end of input");
/// let err: KitchenError = json_err.into();
/// assert!(format!("{}", err).contains("Model JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum KitchenErrorKind {
    /// Model output that is not valid JSON
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Generative API error
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Rejected client input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Server lifecycle error
    #[from(ServerError)]
    Server(ServerError),
}

/// Kitchen error with kind discrimination.
///
/// # Examples
///
/// ```
/// use kitchen_error::{KitchenResult, ConfigError};
///
/// fn might_fail() -> KitchenResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Kitchen Error: {}", _0)]
pub struct KitchenError(Box<KitchenErrorKind>);

impl KitchenError {
    /// Create a new error from a kind.
    pub fn new(kind: KitchenErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &KitchenErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to KitchenErrorKind
impl<T> From<T> for KitchenError
where
    T: Into<KitchenErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Kitchen operations.
pub type KitchenResult<T> = std::result::Result<T, KitchenError>;
