//! Fetch authorization against a domain's robots policy

use crate::robots::RobotsPolicy;
use regex::Regex;

/// Decides whether `url` may be fetched under `policy`
///
/// # Decision Order
///
/// 1. A restricted policy permits every URL.
/// 2. Any matching disallow pattern (trailing `*` stripped) denies.
/// 3. Any matching allow pattern permits.
/// 4. Nothing matched: deny.
///
/// Patterns are regular expressions searched anywhere in the URL. An empty
/// allow pattern matches every URL. An empty disallow pattern (a bare
/// `Disallow: ` line) is skipped, while `*` strips to an empty pattern and
/// denies everything.
///
/// Step 1 inverts the intuitive reading of "restricted" and leaves the
/// disallow list of a restricted domain unreachable. It is kept exactly as
/// observed until the intended polarity is confirmed.
///
/// # Examples
///
/// ```
/// use web_scout::robots::{is_permitted, RobotsPolicy};
///
/// let policy = RobotsPolicy {
///     restricted: false,
///     allowed: vec![],
///     disallowed: vec!["/secret".to_string()],
/// };
/// assert!(!is_permitted(&policy, "https://a.com/secret/1"));
/// assert!(!is_permitted(&policy, "https://a.com/open"));
/// ```
pub fn is_permitted(policy: &RobotsPolicy, url: &str) -> bool {
    if policy.restricted {
        return true;
    }

    for pattern in policy.disallowed.iter().filter(|p| !p.is_empty()) {
        let pattern = pattern.strip_suffix('*').unwrap_or(pattern);
        if pattern_matches(pattern, url) {
            tracing::debug!("{} matches disallow pattern {:?}", url, pattern);
            return false;
        }
    }

    for pattern in &policy.allowed {
        if pattern_matches(pattern, url) {
            tracing::debug!("{} matches allow pattern {:?}", url, pattern);
            return true;
        }
    }

    false
}

/// Searches `url` for `pattern` as a regular expression
///
/// Patterns that are not valid regular expressions fall back to a literal
/// substring search.
fn pattern_matches(pattern: &str, url: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(url),
        Err(e) => {
            tracing::warn!("Invalid robots pattern {:?}, matching literally: {}", pattern, e);
            url.contains(pattern)
        }
    }
}
