//! Output module for crawl artifacts and run statistics
//!
//! This module handles:
//! - Writing `hierarchy.json` and `products.json` for a finished crawl
//! - Recording and logging crawl statistics

mod json;
pub mod stats;

pub use json::{write_artifacts, HIERARCHY_FILE, PRODUCTS_FILE};
pub use stats::{log_statistics, CrawlStats};
