//! Outbound request and response descriptors.

use derive_getters::Getters;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// One outbound HTTP call, immutable for the duration of its retries.
///
/// # Examples
///
/// ```
/// use kitchen_upstream::UpstreamRequest;
/// use serde_json::json;
/// use std::time::Duration;
///
/// let request = UpstreamRequest::post("https://example.test/v1/m:predict", json!({}))
///     .with_header("x-goog-api-key", "secret")
///     .with_timeout(Duration::from_secs(15))
///     .with_max_attempts(1)
///     .with_label("imagen:m");
///
/// assert_eq!(*request.max_attempts(), 1);
/// assert_eq!(request.label(), "imagen:m");
/// ```
#[derive(Debug, Clone, PartialEq, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct UpstreamRequest {
    /// Target URL
    #[setters(skip)]
    url: String,
    /// HTTP method
    method: reqwest::Method,
    /// Extra request headers
    #[setters(skip)]
    headers: Vec<(String, String)>,
    /// JSON body
    #[setters(skip)]
    body: Value,
    /// Hard deadline per attempt
    timeout: Duration,
    /// Attempt ceiling, including the first attempt
    max_attempts: usize,
    /// Diagnostic label for logs
    #[setters(into)]
    label: String,
}

impl UpstreamRequest {
    /// A JSON POST with default timeout (60 s) and attempt ceiling (5).
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            method: reqwest::Method::POST,
            headers: Vec::new(),
            body,
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            label: String::new(),
        }
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct UpstreamResponse {
    status: u16,
    body: String,
}

impl UpstreamResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
