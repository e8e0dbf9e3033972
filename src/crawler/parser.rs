//! Link discovery over raw response bodies
//!
//! There is no DOM parse: the body is scanned for `href="..."` tokens with a
//! single regular expression, and every match counts as a link.

use once_cell::sync::Lazy;
use regex::Regex;

static HREF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(\S+)""#).expect("href pattern is valid"));

/// Returns true if a Content-Type should be scanned for links
pub fn is_html(content_type: &str) -> bool {
    content_type.contains("html")
}

/// Finds every `href="..."` token in a body
///
/// Tokens are returned whole (including `href=` and the quotes), in body
/// order, duplicates included. Invalid UTF-8 is replaced before scanning.
///
/// # Example
///
/// ```
/// use web_scout::crawler::extract_href_tokens;
///
/// let tokens = extract_href_tokens(br#"<a href="/a">A</a> <a href="/b">B</a>"#);
/// assert_eq!(tokens, vec![r#"href="/a""#, r#"href="/b""#]);
/// ```
pub fn extract_href_tokens(body: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(body);
    HREF_PATTERN
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("application/xhtml+xml"));
        assert!(!is_html("application/pdf"));
        assert!(!is_html(""));
    }

    #[test]
    fn test_extract_two_links() {
        let body = br#"<html><body><a href="/one">1</a><a href="https://b.com/two">2</a></body></html>"#;
        let tokens = extract_href_tokens(body);
        assert_eq!(tokens, vec![r#"href="/one""#, r#"href="https://b.com/two""#]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let body = br#"<a href="/same">x</a><a href="/same">y</a>"#;
        assert_eq!(extract_href_tokens(body).len(), 2);
    }

    #[test]
    fn test_link_tags_are_matched_too() {
        let body = br#"<link rel="stylesheet" href="/style.css"><a href="/page">p</a>"#;
        assert_eq!(extract_href_tokens(body).len(), 2);
    }

    #[test]
    fn test_values_with_whitespace_are_skipped() {
        let body = br#"<a href="/has space">x</a><a href="">empty</a>"#;
        assert!(extract_href_tokens(body).is_empty());
    }

    #[test]
    fn test_single_quotes_are_not_matched() {
        let body = br#"<a href='/single'>x</a>"#;
        assert!(extract_href_tokens(body).is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut body = b"<p>\xff\xfe</p>".to_vec();
        body.extend_from_slice(br#"<a href="/ok">ok</a>"#);
        assert_eq!(extract_href_tokens(&body), vec![r#"href="/ok""#]);
    }
}
