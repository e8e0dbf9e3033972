//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests that capture status, Content-Type and the raw body
//! - Classifying the outcome so the caller can record partial results

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Highest status code that counts as a successful fetch
pub const MAX_SUCCESS_STATUS: u16 = 299;

/// Maximum number of redirects the transport follows on its own
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Status was at most 299 and the body was read in full
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty if absent)
        content_type: String,
        /// Raw response body
        body: Vec<u8>,
    },

    /// Server answered with a status code above 299
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Content-Type header value (empty if absent)
        content_type: String,
    },

    /// Response headers arrived but the body could not be read
    BodyError {
        /// The HTTP status code
        status_code: u16,
        /// Content-Type header value (empty if absent)
        content_type: String,
        /// Error description
        error: String,
    },

    /// Network error (connection refused, timeout, TLS, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use web_scout::config::UserAgentConfig;
/// use web_scout::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "WebScout".to_string(),
///     crawler_version: "0.1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// # Request Flow
///
/// | Condition | Result |
/// |-----------|--------|
/// | Transport failure | `NetworkError` |
/// | Status > 299 | `HttpError` (body not read) |
/// | Body read failure | `BodyError` |
/// | Otherwise | `Success` |
///
/// No retries are made; redirects are followed by the client.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status_code = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if status_code > MAX_SUCCESS_STATUS {
        return FetchResult::HttpError {
            status_code,
            content_type,
        };
    }

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            status_code,
            content_type,
            body: body.to_vec(),
        },
        Err(e) => FetchResult::BodyError {
            status_code,
            content_type,
            error: e.to_string(),
        },
    }
}
