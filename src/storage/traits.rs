//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::DocumentState;
use crate::storage::{
    DocumentFilter, DocumentRecord, DomainFilter, DomainRecord, Inserted, NewDocument, NewDomain,
};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    DocumentNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Documents are keyed by URL and domains by host name. Both inserts are
/// insert-if-absent: a duplicate key never creates a second record and
/// returns the id of the existing one instead.
pub trait Storage {
    // ===== Documents =====

    /// Counts documents matching the filter
    fn count_documents(&self, filter: DocumentFilter<'_>) -> StorageResult<u64>;

    /// Finds the first document matching the filter
    fn find_document(&self, filter: DocumentFilter<'_>) -> StorageResult<Option<DocumentRecord>>;

    /// Finds all documents matching the filter, in insertion order
    fn find_documents(&self, filter: DocumentFilter<'_>) -> StorageResult<Vec<DocumentRecord>>;

    /// Inserts a new un-scouted document unless its URL already exists
    fn insert_document(&mut self, document: &NewDocument) -> StorageResult<Inserted>;

    /// Writes the scouting fields of a document
    ///
    /// Updates scouted, alive, allowed, content type, status code, link
    /// count and data. Identity, parent URL and domain are never changed.
    fn update_document(&mut self, document: &DocumentRecord) -> StorageResult<()>;

    // ===== Domains =====

    /// Counts domains matching the filter
    fn count_domains(&self, filter: DomainFilter<'_>) -> StorageResult<u64>;

    /// Finds the first domain matching the filter
    fn find_domain(&self, filter: DomainFilter<'_>) -> StorageResult<Option<DomainRecord>>;

    /// Inserts a new domain unless its name already exists
    fn insert_domain(&mut self, domain: &NewDomain) -> StorageResult<Inserted>;

    // ===== Statistics =====

    /// Counts documents per lifecycle state
    fn count_documents_by_state(&self) -> StorageResult<HashMap<DocumentState, u64>>;

    /// Sums the link counts of all scouted documents
    fn count_links(&self) -> StorageResult<u64>;
}
