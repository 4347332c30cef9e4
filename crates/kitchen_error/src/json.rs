//! Model-output parse failures.

const SNIPPET_CHARS: usize = 80;

/// Model text that could not be parsed as JSON.
///
/// Carries the parser message and the start of the offending text for logs.
/// Neither is shown to API clients; handlers answer with a generic failure.
///
/// # Examples
///
/// ```
/// use kitchen_error::JsonError;
///
/// let err = JsonError::new("expected value at line 1 column 1").with_snippet("Sure! Here is");
/// assert_eq!(err.snippet, "Sure! Here is");
/// assert!(err.to_string().contains("Model JSON Error"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Model JSON Error: {} (output starts {:?}) at line {} in {}", message, snippet, line, file)]
pub struct JsonError {
    /// Parser message
    pub message: String,
    /// Leading characters of the model output
    pub snippet: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// A parse failure with no captured output.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            snippet: String::new(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Keep the first 80 characters of the output that failed to parse.
    pub fn with_snippet(mut self, output: &str) -> Self {
        self.snippet = output.chars().take(SNIPPET_CHARS).collect();
        self
    }
}
