//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Document records (the frontier and its scouting outcomes)
//! - Domain records (one per host, with its robots policy)
//! - Atomic insert-if-absent for both, keyed by URL and host name

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::robots::RobotsPolicy;
use crate::ScoutError;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Store handle shared by every crawl component
pub type SharedStorage = Arc<Mutex<dyn Storage + Send>>;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(ScoutError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, ScoutError> {
    SqliteStorage::open(path)
}

/// Wraps a storage backend into a shared handle
pub fn share<S: Storage + Send + 'static>(storage: S) -> SharedStorage {
    Arc::new(Mutex::new(storage))
}

/// Locks a shared store, mapping a poisoned lock to a storage error
pub fn lock(storage: &SharedStorage) -> StorageResult<MutexGuard<'_, dyn Storage + Send + 'static>> {
    storage.lock().map_err(|_| StorageError::LockPoisoned)
}

/// Represents a document in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub id: i64,
    pub url: String,
    /// URL of the document this one was discovered on (empty for the seed)
    pub url_parent: String,
    pub scouted: bool,
    pub alive: bool,
    pub allowed: bool,
    /// Number of `href` matches found in the body
    pub url_count: u32,
    pub content_type: String,
    pub status_code: u16,
    pub data: Vec<u8>,
    pub domain_id: i64,
    pub discovered_at: String,
    pub scouted_at: Option<String>,
}

/// Fields required to create a new, un-scouted document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub url: String,
    pub url_parent: String,
    pub domain_id: i64,
}

/// Represents a domain in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub id: i64,
    /// Host name, unique across domains
    pub name: String,
    /// Scheme + host, used to locate robots.txt
    pub address: String,
    pub robots_file: bool,
    pub policy: RobotsPolicy,
    pub created_at: String,
}

/// Fields required to create a new domain
#[derive(Debug, Clone)]
pub struct NewDomain {
    pub name: String,
    pub address: String,
    pub robots_file: bool,
    pub policy: RobotsPolicy,
}

/// Structural predicate over document records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFilter<'a> {
    All,
    Id(i64),
    Url(&'a str),
    Scouted(bool),
}

/// Structural predicate over domain records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainFilter<'a> {
    All,
    Id(i64),
    Name(&'a str),
    RobotsFile(bool),
    Restricted(bool),
}

/// Result of an insert-if-absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    /// A new record was written with this id
    New(i64),

    /// A record with the same key already existed with this id
    Existing(i64),
}

impl Inserted {
    /// Returns the record id, whether new or pre-existing
    pub fn id(&self) -> i64 {
        match self {
            Self::New(id) | Self::Existing(id) => *id,
        }
    }

    /// Returns true if this insert created the record
    pub fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }
}
