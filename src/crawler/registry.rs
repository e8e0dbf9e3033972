//! Domain registry
//!
//! Guarantees one domain record per host name. The first time a host is
//! seen its robots.txt is fetched, parsed and stored alongside the domain.

use crate::robots::fetch_robots;
use crate::storage::{lock, DomainFilter, NewDomain, SharedStorage};
use crate::url::extract_host_and_address;
use crate::Result;
use reqwest::Client;

/// Looks up or creates the domain record for a URL
#[derive(Clone)]
pub struct DomainRegistry {
    storage: SharedStorage,
    client: Client,
}

impl DomainRegistry {
    pub fn new(storage: SharedStorage, client: Client) -> Self {
        Self { storage, client }
    }

    /// Returns the id of the domain owning `url`, creating it if needed
    ///
    /// An existing domain is returned without any network traffic. For a new
    /// host, robots.txt is fetched from `<address>/robots.txt`; a non-200
    /// answer or a transport failure records the domain with no robots file
    /// and an empty, unrestricted policy.
    ///
    /// # Errors
    ///
    /// * `ScoutError::Url` - The URL has no host segment
    /// * `ScoutError::Storage` - The lookup or insert failed
    pub async fn ensure_domain(&self, url: &str) -> Result<i64> {
        let (name, address) = extract_host_and_address(url)?;

        let existing = lock(&self.storage)?.find_domain(DomainFilter::Name(&name))?;
        if let Some(domain) = existing {
            tracing::debug!("Domain {} already registered (id {})", name, domain.id);
            return Ok(domain.id);
        }

        let robots = fetch_robots(&self.client, &address).await;
        let domain = NewDomain {
            name,
            address,
            robots_file: robots.exists(),
            policy: robots.into_policy(),
        };

        // Another caller may have inserted the same host while robots.txt was
        // in flight; the insert then resolves to the existing record.
        let inserted = lock(&self.storage)?.insert_domain(&domain)?;
        if inserted.is_new() {
            tracing::info!(
                "Registered domain {} (robots.txt: {}, restricted: {})",
                domain.name,
                domain.robots_file,
                domain.policy.restricted
            );
        }

        Ok(inserted.id())
    }
}
