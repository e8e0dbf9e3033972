//! Crawler module for document scouting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and outcome classification
//! - Link discovery over raw bodies
//! - The domain registry and document lifecycle
//! - The frontier control loop

mod fetcher;
mod frontier;
mod lifecycle;
mod parser;
mod registry;

pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{CrawlReport, Frontier};
pub use lifecycle::DocumentManager;
pub use parser::{extract_href_tokens, is_html};
pub use registry::DomainRegistry;

use crate::config::Config;
use crate::storage::{open_storage, share};
use crate::Result;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the storage layer
/// 2. Build the HTTP client
/// 3. Seed the frontier if the store is empty
/// 4. Run the frontier until it drains, hits its bound or is cancelled
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `shutdown` - Token that stops the crawl between documents
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished
/// * `Err(ScoutError)` - Crawl could not start or the frontier could not be read
pub async fn crawl(config: &Config, shutdown: CancellationToken) -> Result<CrawlReport> {
    let storage = share(open_storage(Path::new(&config.storage.database_path))?);
    let client = build_http_client(&config.user_agent)?;

    let manager = DocumentManager::new(storage, client);
    let frontier = Frontier::new(manager, config.crawler.max_cycles, shutdown);

    frontier.seed(&config.crawler.seed_url).await?;
    frontier.run().await
}
