use crate::{UrlError, UrlResult};

/// Prefix that marks an href value as already absolute
const ABSOLUTE_PREFIX: &str = "http";

/// Resolves a raw `href="<value>"` token against a base URL
///
/// The value is the text between the first pair of double quotes. Values that
/// start with `http` are returned unchanged; anything else is appended to
/// `base_url` as-is. There is deliberately no dot-segment, slash, query or
/// fragment handling.
///
/// # Arguments
///
/// * `base_url` - The URL of the document the token was found in
/// * `href_token` - The matched token, e.g. `href="/docs"`
///
/// # Returns
///
/// * `Ok(String)` - The resolved URL
/// * `Err(UrlError::MissingQuotedValue)` - The token has no quoted value
///
/// # Examples
///
/// ```
/// use web_scout::url::resolve;
///
/// assert_eq!(resolve("https://a.com/p", r#"href="/q""#).unwrap(), "https://a.com/p/q");
/// assert_eq!(resolve("https://a.com/p", r#"href="https://b.com/z""#).unwrap(), "https://b.com/z");
/// ```
pub fn resolve(base_url: &str, href_token: &str) -> UrlResult<String> {
    let value = quoted_value(href_token)
        .ok_or_else(|| UrlError::MissingQuotedValue(href_token.to_string()))?;

    if value.starts_with(ABSOLUTE_PREFIX) {
        return Ok(value.to_string());
    }

    Ok(format!("{}{}", base_url, value))
}

/// Returns the text between the first pair of double quotes
fn quoted_value(token: &str) -> Option<&str> {
    let mut parts = token.split('"');
    parts.next()?;
    let value = parts.next()?;

    // A lone opening quote leaves no closing field behind it
    parts.next()?;
    Some(value)
}
