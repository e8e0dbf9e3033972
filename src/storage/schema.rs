//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Web-Scout database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One record per host, with its parsed robots.txt policy
CREATE TABLE IF NOT EXISTS domains (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    address TEXT NOT NULL,
    robots_file INTEGER NOT NULL DEFAULT 0,
    restrictions INTEGER NOT NULL DEFAULT 0,
    allowed TEXT NOT NULL DEFAULT '[]',
    disallowed TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL
);

-- Every discovered URL and the outcome of scouting it
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    url_parent TEXT NOT NULL DEFAULT '',
    scouted INTEGER NOT NULL DEFAULT 0,
    alive INTEGER NOT NULL DEFAULT 0,
    allowed INTEGER NOT NULL DEFAULT 0,
    url_count INTEGER NOT NULL DEFAULT 0,
    content_type TEXT NOT NULL DEFAULT '',
    status_code INTEGER NOT NULL DEFAULT 0,
    data BLOB NOT NULL DEFAULT x'',
    domain_id INTEGER NOT NULL REFERENCES domains(id),
    discovered_at TEXT NOT NULL,
    scouted_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_documents_scouted ON documents(scouted);
CREATE INDEX IF NOT EXISTS idx_documents_domain ON documents(domain_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
