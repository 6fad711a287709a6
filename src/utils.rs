//! Small string helpers shared by the extractor, summarizers and logging.

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and the dropped byte count appended.
///
/// # Arguments
///
/// * `s` - The string to truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// `s` unchanged when it fits, otherwise at most its first `max` bytes
/// followed by `…(+N bytes)`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Keep only the first `max` whitespace-separated words of `s`.
///
/// Text already within the limit is returned as-is, including its original
/// spacing.
pub fn first_words(s: &str, max: usize) -> String {
    if word_count(s) <= max {
        return s.to_string();
    }
    s.split_whitespace().take(max).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_exact_suffix() {
        assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
        assert_eq!(truncate_for_log("exactly", 7), "exactly");
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let s = "héllo wörld";
        let result = truncate_for_log(s, 2);
        assert!(result.starts_with('h'));
        assert!(result.contains("bytes)"));
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("  a\n\t b   c "), "a b c");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two\nthree"), 3);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_first_words() {
        assert_eq!(first_words("a b c d", 2), "a b");
        assert_eq!(first_words("a  b", 5), "a  b");
    }
}
