//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::robots::RobotsPolicy;
use crate::state::DocumentState;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    DocumentFilter, DocumentRecord, DomainFilter, DomainRecord, Inserted, NewDocument, NewDomain,
};
use crate::ScoutError;
use chrono::Utc;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

const DOCUMENT_COLUMNS: &str = "id, url, url_parent, scouted, alive, allowed, url_count, \
     content_type, status_code, data, domain_id, discovered_at, scouted_at";

const DOMAIN_COLUMNS: &str =
    "id, name, address, robots_file, restrictions, allowed, disallowed, created_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a SqliteStorage database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(ScoutError)` - Failed to open database
    pub fn open(path: &Path) -> Result<Self, ScoutError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> Result<Self, ScoutError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Builds the WHERE clause and parameters for a document filter
fn document_clause(filter: DocumentFilter<'_>) -> (&'static str, Vec<Value>) {
    match filter {
        DocumentFilter::All => ("1 = 1", vec![]),
        DocumentFilter::Id(id) => ("id = ?1", vec![Value::Integer(id)]),
        DocumentFilter::Url(url) => ("url = ?1", vec![Value::Text(url.to_string())]),
        DocumentFilter::Scouted(scouted) => ("scouted = ?1", vec![Value::Integer(scouted as i64)]),
    }
}

/// Builds the WHERE clause and parameters for a domain filter
fn domain_clause(filter: DomainFilter<'_>) -> (&'static str, Vec<Value>) {
    match filter {
        DomainFilter::All => ("1 = 1", vec![]),
        DomainFilter::Id(id) => ("id = ?1", vec![Value::Integer(id)]),
        DomainFilter::Name(name) => ("name = ?1", vec![Value::Text(name.to_string())]),
        DomainFilter::RobotsFile(flag) => ("robots_file = ?1", vec![Value::Integer(flag as i64)]),
        DomainFilter::Restricted(flag) => ("restrictions = ?1", vec![Value::Integer(flag as i64)]),
    }
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        url_parent: row.get(2)?,
        scouted: row.get(3)?,
        alive: row.get(4)?,
        allowed: row.get(5)?,
        url_count: row.get(6)?,
        content_type: row.get(7)?,
        status_code: row.get(8)?,
        data: row.get(9)?,
        domain_id: row.get(10)?,
        discovered_at: row.get(11)?,
        scouted_at: row.get(12)?,
    })
}

fn domain_from_row(row: &Row<'_>) -> rusqlite::Result<DomainRecord> {
    Ok(DomainRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        robots_file: row.get(3)?,
        policy: RobotsPolicy {
            restricted: row.get(4)?,
            allowed: patterns_from_column(row, 5)?,
            disallowed: patterns_from_column(row, 6)?,
        },
        created_at: row.get(7)?,
    })
}

/// Decodes a JSON array of patterns stored in a TEXT column
fn patterns_from_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(index)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

fn patterns_to_column(patterns: &[String]) -> StorageResult<String> {
    serde_json::to_string(patterns).map_err(|e| StorageError::Serialization(e.to_string()))
}

impl Storage for SqliteStorage {
    // ===== Documents =====

    fn count_documents(&self, filter: DocumentFilter<'_>) -> StorageResult<u64> {
        let (clause, values) = document_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM documents WHERE {}", clause),
            params_from_iter(values),
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn find_document(&self, filter: DocumentFilter<'_>) -> StorageResult<Option<DocumentRecord>> {
        let (clause, values) = document_clause(filter);
        let document = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM documents WHERE {} ORDER BY id LIMIT 1",
                    DOCUMENT_COLUMNS, clause
                ),
                params_from_iter(values),
                document_from_row,
            )
            .optional()?;
        Ok(document)
    }

    fn find_documents(&self, filter: DocumentFilter<'_>) -> StorageResult<Vec<DocumentRecord>> {
        let (clause, values) = document_clause(filter);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM documents WHERE {} ORDER BY id",
            DOCUMENT_COLUMNS, clause
        ))?;

        let documents = stmt
            .query_map(params_from_iter(values), document_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(documents)
    }

    fn insert_document(&mut self, document: &NewDocument) -> StorageResult<Inserted> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO documents (url, url_parent, domain_id, discovered_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![document.url, document.url_parent, document.domain_id, now],
        )?;

        if changed > 0 {
            return Ok(Inserted::New(self.conn.last_insert_rowid()));
        }

        let id: i64 = self.conn.query_row(
            "SELECT id FROM documents WHERE url = ?1",
            params![document.url],
            |row| row.get(0),
        )?;
        Ok(Inserted::Existing(id))
    }

    fn update_document(&mut self, document: &DocumentRecord) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let matched = self.conn.execute(
            "UPDATE documents SET scouted = ?1, alive = ?2, allowed = ?3, content_type = ?4,
             status_code = ?5, url_count = ?6, data = ?7, scouted_at = ?8 WHERE id = ?9",
            params![
                document.scouted,
                document.alive,
                document.allowed,
                document.content_type,
                document.status_code,
                document.url_count,
                document.data,
                now,
                document.id
            ],
        )?;

        if matched == 0 {
            return Err(StorageError::DocumentNotFound(document.id));
        }
        Ok(())
    }

    // ===== Domains =====

    fn count_domains(&self, filter: DomainFilter<'_>) -> StorageResult<u64> {
        let (clause, values) = domain_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM domains WHERE {}", clause),
            params_from_iter(values),
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn find_domain(&self, filter: DomainFilter<'_>) -> StorageResult<Option<DomainRecord>> {
        let (clause, values) = domain_clause(filter);
        let domain = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM domains WHERE {} ORDER BY id LIMIT 1",
                    DOMAIN_COLUMNS, clause
                ),
                params_from_iter(values),
                domain_from_row,
            )
            .optional()?;
        Ok(domain)
    }

    fn insert_domain(&mut self, domain: &NewDomain) -> StorageResult<Inserted> {
        let now = Utc::now().to_rfc3339();
        let allowed = patterns_to_column(&domain.policy.allowed)?;
        let disallowed = patterns_to_column(&domain.policy.disallowed)?;

        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO domains
             (name, address, robots_file, restrictions, allowed, disallowed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                domain.name,
                domain.address,
                domain.robots_file,
                domain.policy.restricted,
                allowed,
                disallowed,
                now
            ],
        )?;

        if changed > 0 {
            return Ok(Inserted::New(self.conn.last_insert_rowid()));
        }

        let id: i64 = self.conn.query_row(
            "SELECT id FROM domains WHERE name = ?1",
            params![domain.name],
            |row| row.get(0),
        )?;
        Ok(Inserted::Existing(id))
    }

    // ===== Statistics =====

    fn count_documents_by_state(&self) -> StorageResult<HashMap<DocumentState, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT scouted, alive, allowed, status_code, COUNT(*) FROM documents
             GROUP BY scouted, alive, allowed, status_code",
        )?;

        let rows = stmt.query_map([], |row| {
            let state = DocumentState::from_fields(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?);
            let count: i64 = row.get(4)?;
            Ok((state, count as u64))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (state, count) = row?;
            *counts.entry(state).or_insert(0) += count;
        }

        Ok(counts)
    }

    fn count_links(&self) -> StorageResult<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(url_count), 0) FROM documents WHERE scouted = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }
}
