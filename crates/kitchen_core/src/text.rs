//! Model text post-processing.

use kitchen_error::JsonError;
use serde_json::Value;

/// Remove Markdown code-fence markers the model wraps around JSON.
///
/// # Examples
///
/// ```
/// use kitchen_core::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
/// assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
/// ```
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json").or_else(|| text.strip_prefix("```JSON")) {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse model output as JSON after stripping code fences.
///
/// Returns `Ok(None)` when nothing is left to parse, so callers can tell
/// "the model produced nothing" apart from a valid empty value.
pub fn parse_model_json(raw: &str) -> Result<Option<Value>, JsonError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(cleaned)
        .map(Some)
        .map_err(|e| JsonError::new(e.to_string()).with_snippet(cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json_untouched() {
        assert_eq!(strip_code_fences("[]"), "[]");
    }

    #[test]
    fn test_bare_fence() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert_eq!(parse_model_json("").unwrap(), None);
        assert_eq!(parse_model_json("```json\n```").unwrap(), None);
    }

    #[test]
    fn test_parse_valid_empty_list_is_some() {
        assert_eq!(parse_model_json("[]").unwrap(), Some(json!([])));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let err = parse_model_json("```json\nSure! Here is your recipe\n```").unwrap_err();
        assert_eq!(err.snippet, "Sure! Here is your recipe");
    }
}
