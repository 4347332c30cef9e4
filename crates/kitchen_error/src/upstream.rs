//! Upstream (generative API) error types and failure classification.

/// How the retry client treats an upstream HTTP status.
///
/// # Examples
///
/// ```
/// use kitchen_error::{StatusClass, classify};
///
/// assert_eq!(classify(200), StatusClass::Success);
/// assert_eq!(classify(429), StatusClass::Retryable);
/// assert_eq!(classify(503), StatusClass::Retryable);
/// assert_eq!(classify(403), StatusClass::NonRetryable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StatusClass {
    /// 2xx: parse and return the body
    #[display("success")]
    Success,
    /// 429 or 5xx: back off and try again
    #[display("retryable")]
    Retryable,
    /// Any other status: the request itself was rejected
    #[display("non-retryable")]
    NonRetryable,
}

/// Classify an upstream HTTP status code.
///
/// 429 and every status at or above 500 are transient. Everything else outside
/// 2xx (400, 403, 451, ...) is a rejection that retrying cannot fix.
pub fn classify(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        429 => StatusClass::Retryable,
        s if s >= 500 => StatusClass::Retryable,
        _ => StatusClass::NonRetryable,
    }
}

/// Upstream-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// API key not configured
    #[display("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    /// Connection-level failure (DNS, refused, reset)
    #[display("Upstream transport failed: {}", _0)]
    Transport(String),
    /// Per-call deadline elapsed
    #[display("Upstream call timed out after {}ms", _0)]
    Timeout(u64),
    /// Upstream answered with a non-success status
    #[display("Upstream returned HTTP {}: {}", status, body)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body preview
        body: String,
    },
    /// 2xx response whose body was not valid JSON
    #[display("Upstream response could not be decoded: {}", _0)]
    Decode(String),
}

impl UpstreamErrorKind {
    /// Check if this failure should be retried by the backoff client.
    ///
    /// Network failures and timeouts are transient, statuses follow [`classify`].
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamErrorKind::Transport(_) | UpstreamErrorKind::Timeout(_) => true,
            UpstreamErrorKind::Status { status, .. } => {
                classify(*status) == StatusClass::Retryable
            }
            _ => false,
        }
    }
}

/// Upstream error with source location tracking.
///
/// # Examples
///
/// ```
/// use kitchen_error::{UpstreamError, UpstreamErrorKind};
///
/// let err = UpstreamError::new(UpstreamErrorKind::Status {
///     status: 503,
///     body: "overloaded".to_string(),
/// });
/// assert!(err.kind.is_retryable());
/// assert!(format!("{}", err).contains("HTTP 503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The kind of error that occurred
    pub kind: UpstreamErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new UpstreamError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &UpstreamErrorKind {
        &self.kind
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
