use crate::extract::ExtractorKind;
use serde::Deserialize;

/// Main configuration structure for Shop-Scrape
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(rename = "site", default = "default_sites")]
    pub sites: Vec<SiteEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            sites: default_sites(),
        }
    }
}

impl Config {
    /// Looks up the site entry whose URL matches `url`
    ///
    /// Trailing slashes are ignored on both sides, so `https://shop.test` and
    /// `https://shop.test/` select the same entry.
    pub fn find_site(&self, url: &str) -> Option<&SiteEntry> {
        let wanted = url.trim_end_matches('/');
        self.sites
            .iter()
            .find(|site| site.url.trim_end_matches('/') == wanted)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of browsing sessions open at the same time
    #[serde(rename = "max-concurrent-sessions")]
    pub max_concurrent_sessions: u32,

    /// Timeout for a single page navigation (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sessions: 8,
            navigation_timeout_ms: 30_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "shop-scrape".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "ops@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which the per-host artifact directory is created
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

/// A supported shop and the extraction rules used for it
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Catalogue entry URL, e.g. "https://demo-shop.natek.eu"
    pub url: String,

    /// Which extractor understands this shop's markup
    pub extractor: ExtractorKind,
}

fn default_sites() -> Vec<SiteEntry> {
    vec![SiteEntry {
        url: "https://demo-shop.natek.eu".to_string(),
        extractor: ExtractorKind::WooCommerce,
    }]
}
