//! Robots.txt handling module
//!
//! This module fetches and parses robots.txt files and decides whether a URL
//! may be fetched under the resulting policy.

mod authorize;
mod parser;

pub use authorize::is_permitted;
pub use parser::{parse_robots, RobotsPolicy};

use crate::url::robots_url;
use reqwest::{Client, StatusCode};

/// Outcome of fetching robots.txt for a domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsFile {
    /// robots.txt answered 200 and was parsed
    Found(RobotsPolicy),

    /// No usable robots.txt (non-200 status or transport failure)
    Missing,
}

impl RobotsFile {
    /// Returns true if the domain serves a robots.txt
    pub fn exists(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the policy to store for the domain
    ///
    /// A missing file fails open to an unrestricted, empty policy.
    pub fn into_policy(self) -> RobotsPolicy {
        match self {
            Self::Found(policy) => policy,
            Self::Missing => RobotsPolicy::unrestricted(),
        }
    }
}

/// Fetches and parses robots.txt for a domain address
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `address` - The domain address (scheme + host), e.g. `https://example.com`
///
/// # Returns
///
/// * `RobotsFile::Found` - HTTP 200 with a readable body
/// * `RobotsFile::Missing` - Any other status, or a transport/body error
pub async fn fetch_robots(client: &Client, address: &str) -> RobotsFile {
    let location = robots_url(address);
    tracing::debug!("Fetching {}", location);

    let response = match client.get(&location).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Error retrieving {}: {}", location, e);
            return RobotsFile::Missing;
        }
    };

    if response.status() != StatusCode::OK {
        tracing::debug!("No robots.txt at {} (HTTP {})", location, response.status());
        return RobotsFile::Missing;
    }

    match response.bytes().await {
        Ok(body) => RobotsFile::Found(parse_robots(&String::from_utf8_lossy(&body))),
        Err(e) => {
            tracing::warn!("Error reading {}: {}", location, e);
            RobotsFile::Missing
        }
    }
}
