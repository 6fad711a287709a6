//! URL format validation for incoming analysis requests.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?",
        r"|localhost",
        r"|[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})",
        r"(?::[0-9]+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("URL pattern is valid")
});

/// Check that `url` looks like an absolute http(s) URL pointing at a
/// domain, `localhost`, or an IPv4 literal.
///
/// This is a format check only; it does not resolve or contact the host.
pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_article_urls() {
        assert!(is_valid_url("https://lite.cnn.com/2025/05/06/politics/some-story"));
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("http://example.com/"));
        assert!(is_valid_url("https://www.bbc.co.uk/news/world-123?ref=home"));
        assert!(is_valid_url("HTTPS://EXAMPLE.ORG/Path"));
    }

    #[test]
    fn test_accepts_localhost_ip_and_port() {
        assert!(is_valid_url("http://localhost:5000/article"));
        assert!(is_valid_url("http://127.0.0.1/story"));
        assert!(is_valid_url("https://10.0.0.2:8443"));
    }

    #[test]
    fn test_rejects_bad_scheme_and_shapes() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("example.com/story"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("https://-bad-.com"));
        assert!(!is_valid_url("https://example.c"));
        assert!(!is_valid_url("https://example.com/has space"));
    }
}
