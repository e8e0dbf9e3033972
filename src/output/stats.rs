//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::state::DocumentState;
use crate::storage::{DocumentFilter, DomainFilter, Storage};
use crate::ScoutError;
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of documents discovered
    pub total_documents: u64,

    /// Count of documents by lifecycle state
    pub documents_by_state: HashMap<DocumentState, u64>,

    /// Number of registered domains
    pub total_domains: u64,

    /// Domains that served a robots.txt
    pub domains_with_robots: u64,

    /// Domains whose robots policy is restricted
    pub restricted_domains: u64,

    /// Total number of links found on scouted documents
    pub total_links: u64,
}

impl CrawlStatistics {
    /// Returns the count for a state, zero if absent
    pub fn count(&self, state: DocumentState) -> u64 {
        self.documents_by_state.get(&state).copied().unwrap_or(0)
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(ScoutError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, ScoutError> {
    let total_documents = storage.count_documents(DocumentFilter::All)?;
    let total_domains = storage.count_domains(DomainFilter::All)?;
    let domains_with_robots = storage.count_domains(DomainFilter::RobotsFile(true))?;
    let restricted_domains = storage.count_domains(DomainFilter::Restricted(true))?;
    let total_links = storage.count_links()?;

    let mut documents_by_state = storage.count_documents_by_state()?;
    documents_by_state.retain(|_, count| *count > 0);

    Ok(CrawlStatistics {
        total_documents,
        documents_by_state,
        total_domains,
        domains_with_robots,
        restricted_domains,
        total_links,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total documents discovered: {}", stats.total_documents);
    println!(
        "  Domains: {} ({} with robots.txt, {} restricted)",
        stats.total_domains, stats.domains_with_robots, stats.restricted_domains
    );
    println!("  Total links found: {}", stats.total_links);
    println!();

    println!("Documents by State:");
    for state in DocumentState::ALL {
        let count = stats.count(state);
        if count == 0 {
            continue;
        }
        let percentage = if stats.total_documents > 0 {
            (count as f64 / stats.total_documents as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    let scouted = stats.total_documents - stats.count(DocumentState::New);
    let alive = stats.count(DocumentState::Alive);
    let success_rate = if scouted > 0 {
        (alive as f64 / scouted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} scouted documents alive)",
        success_rate, alive, scouted
    );
}
