//! Lifecycle state definitions for documents
//!
//! A document is stored as a set of flags; this module classifies those flags
//! into the state a document is in.

use crate::storage::DocumentRecord;
use std::fmt;

/// Represents the current state of a document in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentState {
    // ===== Active States =====
    /// Document has been discovered but no fetch attempt was made yet
    New,

    // ===== Terminal States =====
    /// Fetch was not permitted by the domain's robots policy
    Denied,

    /// Fetch failed in transport or while reading the body
    Unreachable,

    /// Server answered with a status code above 299
    HttpError,

    /// Fetch succeeded and the body was stored
    Alive,
}

impl DocumentState {
    /// All states, in lifecycle order
    pub const ALL: [DocumentState; 5] = [
        Self::New,
        Self::Denied,
        Self::Unreachable,
        Self::HttpError,
        Self::Alive,
    ];

    /// Classifies a stored document
    pub fn of(document: &DocumentRecord) -> Self {
        Self::from_fields(
            document.scouted,
            document.alive,
            document.allowed,
            document.status_code,
        )
    }

    /// Classifies the raw scouting flags of a document
    pub fn from_fields(scouted: bool, alive: bool, allowed: bool, status_code: u16) -> Self {
        if !scouted {
            Self::New
        } else if !allowed {
            Self::Denied
        } else if alive {
            Self::Alive
        } else if status_code > 299 {
            Self::HttpError
        } else {
            Self::Unreachable
        }
    }

    /// Returns true if this represents a failed fetch
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Unreachable | Self::HttpError)
    }

    /// Returns a short lowercase name for reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Denied => "denied",
            Self::Unreachable => "unreachable",
            Self::HttpError => "http_error",
            Self::Alive => "alive",
        }
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
