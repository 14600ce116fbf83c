//! Shop-Scrape: a catalogue crawler for retail shop sites
//!
//! This crate walks a shop's category hierarchy, pages through its product
//! listing and harvests every product detail page concurrently over a pool of
//! browsing sessions drawn from one browser.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Shop-Scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Request for {url} was aborted by the request filter")]
    RequestAborted { url: String },

    #[error("Extraction failed on {url}: {source}")]
    Extraction { url: String, source: ExtractError },

    #[error("No page is loaded in this session")]
    NoPageLoaded,

    #[error("Browser has been closed")]
    BrowserClosed,

    #[error("Session pool error: {0}")]
    SessionPool(String),

    #[error("Harvest task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid stage transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlStage,
        to: state::CrawlStage,
    },

    #[error("Site not supported: {url}")]
    UnsupportedSite { url: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while pulling data out of a loaded page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("No element matches '{selector}'")]
    MissingElement { selector: String },

    #[error("Element '{selector}' has no '{attribute}' attribute")]
    MissingAttribute { selector: String, attribute: String },

    #[error("Required field '{field}' not found ('{selector}')")]
    MissingField {
        field: &'static str,
        selector: String,
    },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("Invalid URL '{href}': {reason}")]
    InvalidUrl { href: String, reason: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Shop-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction steps
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{scrape, Coordinator};
pub use model::{CategoryNode, CategoryTree, CrawlResult, ProductDetail, ProductRefs};
pub use state::CrawlStage;
