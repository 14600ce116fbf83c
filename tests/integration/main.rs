//! Integration tests for Shop-Scrape

mod cli_tests;
mod crawl_tests;
mod fixtures;
