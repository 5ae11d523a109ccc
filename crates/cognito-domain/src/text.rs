//! Small text helpers shared by prompt builders and parsers

/// Truncate `text` to at most `max_chars` characters, respecting UTF-8 boundaries
///
/// # Examples
///
/// ```
/// use cognito_domain::text::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("abc", 10), "abc");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
