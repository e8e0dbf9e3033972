//! Output module for crawl reporting
//!
//! This module reads the crawl database back and reports document and domain
//! statistics.

pub mod stats;

pub use stats::{load_statistics, print_statistics, CrawlStatistics};
