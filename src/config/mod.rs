//! Configuration module for Shop-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing sections fall back to built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use shop_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Session limit: {}", config.crawler.max_concurrent_sessions);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteEntry, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
