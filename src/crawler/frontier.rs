//! Frontier driver - the crawl control loop
//!
//! Each cycle selects every un-scouted document and scouts them one at a
//! time. The loop ends when the frontier is empty, when the optional cycle
//! bound is reached, when a cycle makes no progress, or when the shutdown
//! token is cancelled.

use crate::crawler::lifecycle::DocumentManager;
use crate::state::DocumentState;
use crate::storage::{lock, DocumentFilter, Inserted};
use crate::Result;
use tokio_util::sync::CancellationToken;

/// Summary of a frontier run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Cycles started
    pub cycles: u32,
    /// Documents scouted, whatever the outcome
    pub scouted: u64,
    /// Documents fetched with a status of at most 299
    pub alive: u64,
    /// Documents the robots policy did not permit
    pub denied: u64,
    /// Documents whose fetch failed (transport, body or HTTP status)
    pub failed: u64,
    /// Documents whose scouting returned an error
    pub errors: u64,
}

impl CrawlReport {
    /// Counts one scouted document in its final state
    pub fn record(&mut self, state: DocumentState) {
        self.scouted += 1;
        match state {
            DocumentState::Alive => self.alive += 1,
            DocumentState::Denied => self.denied += 1,
            state if state.is_error() => self.failed += 1,
            _ => {}
        }
    }
}

/// Drives un-scouted documents through the lifecycle manager
pub struct Frontier {
    manager: DocumentManager,
    max_cycles: Option<u32>,
    shutdown: CancellationToken,
}

impl Frontier {
    /// Creates a frontier driver
    ///
    /// # Arguments
    ///
    /// * `manager` - The document manager that performs scouting
    /// * `max_cycles` - Optional cycle bound; `None` runs until the frontier drains
    /// * `shutdown` - Token that stops the loop between documents
    pub fn new(
        manager: DocumentManager,
        max_cycles: Option<u32>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            manager,
            max_cycles,
            shutdown,
        }
    }

    /// Creates the seed document if the store holds no documents yet
    ///
    /// Returns `None` when the store already has documents.
    pub async fn seed(&self, url: &str) -> Result<Option<Inserted>> {
        let existing = lock(self.manager.storage())?.count_documents(DocumentFilter::All)?;
        if existing > 0 {
            tracing::info!("Store holds {} documents, not seeding", existing);
            return Ok(None);
        }

        tracing::info!("Seeding frontier with {}", url);
        let inserted = self.manager.create(url, "").await?;
        Ok(Some(inserted))
    }

    /// Runs the control loop
    ///
    /// Errors from scouting a single document are logged and counted; only a
    /// failure to read the frontier itself ends the run with an error.
    pub async fn run(&self) -> Result<CrawlReport> {
        let mut report = CrawlReport::default();

        loop {
            if self.shutdown.is_cancelled() {
                tracing::info!("Shutdown requested, stopping crawl");
                break;
            }

            if let Some(max) = self.max_cycles {
                if report.cycles >= max {
                    tracing::info!("Reached cycle limit ({})", max);
                    break;
                }
            }

            let pending =
                lock(self.manager.storage())?.find_documents(DocumentFilter::Scouted(false))?;
            tracing::info!("Number of documents to scout: {}", pending.len());

            if pending.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            report.cycles += 1;
            let mut progressed = false;

            for document in pending {
                if self.shutdown.is_cancelled() {
                    break;
                }

                let url = document.url.clone();
                match self.manager.scout(document).await {
                    Ok(scouted) => {
                        progressed = true;
                        report.record(DocumentState::of(&scouted));
                    }
                    Err(e) => {
                        tracing::error!("Error scouting {}: {}", url, e);
                        report.errors += 1;
                    }
                }
            }

            if !progressed && !self.shutdown.is_cancelled() {
                tracing::warn!("No document could be scouted this cycle, stopping");
                break;
            }
        }

        tracing::info!(
            "Crawl finished after {} cycles: {} scouted ({} alive, {} denied, {} failed), {} errors",
            report.cycles,
            report.scouted,
            report.alive,
            report.denied,
            report.failed,
            report.errors
        );

        Ok(report)
    }
}
