//! Document lifecycle management
//!
//! A document is created once, un-scouted, and scouted exactly once. Scouting
//! authorizes the URL against its domain's robots policy, fetches it, records
//! the outcome and feeds any discovered links back in as new documents.

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{extract_href_tokens, is_html};
use crate::crawler::registry::DomainRegistry;
use crate::robots::is_permitted;
use crate::storage::{
    lock, DocumentRecord, DomainFilter, DomainRecord, Inserted, NewDocument, SharedStorage,
};
use crate::url::resolve;
use crate::{Result, ScoutError};
use reqwest::Client;

/// Creates and scouts documents
pub struct DocumentManager {
    storage: SharedStorage,
    client: Client,
    registry: DomainRegistry,
}

impl DocumentManager {
    pub fn new(storage: SharedStorage, client: Client) -> Self {
        let registry = DomainRegistry::new(storage.clone(), client.clone());
        Self {
            storage,
            client,
            registry,
        }
    }

    /// Returns the shared store this manager writes to
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// Creates an un-scouted document for `url` unless it already exists
    ///
    /// The owning domain is registered first, which may fetch robots.txt for
    /// a host seen for the first time. The insert itself is atomic on the URL.
    ///
    /// # Errors
    ///
    /// * `ScoutError::Url` - The URL has no host segment; nothing is written
    /// * `ScoutError::Storage` - The domain or document write failed
    pub async fn create(&self, url: &str, parent_url: &str) -> Result<Inserted> {
        let domain_id = self.registry.ensure_domain(url).await?;

        let document = NewDocument {
            url: url.to_string(),
            url_parent: parent_url.to_string(),
            domain_id,
        };
        let inserted = lock(&self.storage)?.insert_document(&document)?;

        match inserted {
            Inserted::New(id) => tracing::info!("Inserted document {} ({})", id, url),
            Inserted::Existing(id) => tracing::debug!("Document {} already exists ({})", id, url),
        }

        Ok(inserted)
    }

    /// Performs the single scouting transition of a document
    ///
    /// The final state is persisted on every path, including a failed domain
    /// lookup, which is recorded as denied before the error is returned.
    ///
    /// # Errors
    ///
    /// * `ScoutError::DomainLookup` - The document's domain could not be read
    /// * `ScoutError::Storage` - The final state could not be written
    pub async fn scout(&self, mut document: DocumentRecord) -> Result<DocumentRecord> {
        document.scouted = true;
        document.alive = false;
        document.allowed = false;

        let domain = match self.lookup_domain(document.domain_id) {
            Ok(domain) => domain,
            Err(e) => {
                self.persist(&document)?;
                return Err(ScoutError::DomainLookup {
                    url: document.url.clone(),
                    source: Box::new(e),
                });
            }
        };

        if !is_permitted(&domain.policy, &document.url) {
            tracing::info!("Not allowed to scout {}", document.url);
            self.persist(&document)?;
            return Ok(document);
        }

        document.allowed = true;
        tracing::info!("Scouting {}", document.url);

        match fetch_url(&self.client, &document.url).await {
            FetchResult::Success {
                status_code,
                content_type,
                body,
            } => {
                document.status_code = status_code;
                document.content_type = content_type;
                document.alive = true;
                document.data = body;

                if is_html(&document.content_type) {
                    self.discover_links(&mut document).await;
                }
            }
            FetchResult::HttpError {
                status_code,
                content_type,
            } => {
                tracing::warn!("HTTP {} for {}", status_code, document.url);
                document.status_code = status_code;
                document.content_type = content_type;
            }
            FetchResult::BodyError {
                status_code,
                content_type,
                error,
            } => {
                tracing::warn!("Error reading body of {}: {}", document.url, error);
                document.status_code = status_code;
                document.content_type = content_type;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Error fetching {}: {}", document.url, error);
            }
        }

        self.persist(&document)?;
        Ok(document)
    }

    /// Scans the body for links and creates a document for each
    ///
    /// The link count covers every match, including links that could not be
    /// resolved or created.
    async fn discover_links(&self, document: &mut DocumentRecord) {
        let tokens = extract_href_tokens(&document.data);
        document.url_count = tokens.len() as u32;
        tracing::debug!("Found {} links on {}", tokens.len(), document.url);

        for token in &tokens {
            let link = match resolve(&document.url, token) {
                Ok(link) => link,
                Err(e) => {
                    tracing::warn!("Skipping link on {}: {}", document.url, e);
                    continue;
                }
            };

            if let Err(e) = self.create(&link, &document.url).await {
                tracing::warn!("Skipping link {} on {}: {}", link, document.url, e);
            }
        }
    }

    fn lookup_domain(&self, id: i64) -> Result<DomainRecord> {
        let domain = lock(&self.storage)?.find_domain(DomainFilter::Id(id))?;
        domain.ok_or(ScoutError::DomainNotFound { id })
    }

    fn persist(&self, document: &DocumentRecord) -> Result<()> {
        lock(&self.storage)?.update_document(document)?;
        Ok(())
    }
}
