//! Text sanitization primitives.

/// Strip ASCII control characters (0x00-0x1F, 0x7F) and trim whitespace.
///
/// Sanitizing an already sanitized string returns it unchanged.
///
/// # Examples
///
/// ```
/// use kitchen_security::sanitize_text;
///
/// assert_eq!(sanitize_text("  Tom\u{0}ato\n"), "Tomato");
/// assert_eq!(sanitize_text("Борщ"), "Борщ");
/// ```
pub fn sanitize_text(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| !c.is_ascii_control()).collect();
    stripped.trim().to_string()
}

/// Keep at most `max` characters (not bytes).
///
/// # Examples
///
/// ```
/// use kitchen_security::truncate_chars;
///
/// assert_eq!(truncate_chars("абвгд", 3), "абв");
/// assert_eq!(truncate_chars("ab", 3), "ab");
/// ```
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((byte_index, _)) => input[..byte_index].to_string(),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_delete_and_tabs() {
        assert_eq!(sanitize_text("a\u{7f}b\tc"), "abc");
    }

    #[test]
    fn test_keeps_inner_spaces() {
        assert_eq!(sanitize_text(" fresh basil "), "fresh basil");
    }

    #[test]
    fn test_only_controls_is_empty() {
        assert_eq!(sanitize_text("\r\n\u{1}"), "");
    }

    #[test]
    fn test_truncate_zero() {
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
