//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `DocumentState`: the lifecycle state of a document (new, denied, unreachable, http error, alive)

mod document_state;

// Re-export main types
pub use document_state::DocumentState;
