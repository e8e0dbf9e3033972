//! URL handling module for Web-Scout
//!
//! This module turns raw href tokens into absolute URLs and splits URLs into
//! the host and address used to key domain records.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::extract_host_and_address;
pub use resolve::resolve;

/// Builds the robots.txt location for a domain address
///
/// # Examples
///
/// ```
/// use web_scout::url::robots_url;
///
/// assert_eq!(robots_url("https://example.com"), "https://example.com/robots.txt");
/// ```
pub fn robots_url(address: &str) -> String {
    format!("{}/robots.txt", address)
}
