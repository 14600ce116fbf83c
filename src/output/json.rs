//! JSON artifact writer
//!
//! A successful crawl is persisted as two files in a directory named after
//! the shop's host:
//!
//! - `hierarchy.json`: the category tree as a bare array
//! - `products.json`: every detail record
//!
//! Both are pretty-printed with two-space indentation.

use crate::model::CrawlResult;
use crate::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const HIERARCHY_FILE: &str = "hierarchy.json";
pub const PRODUCTS_FILE: &str = "products.json";

/// Writes both artifacts under `<base_dir>/<host>/`
///
/// The directory is created if absent and existing artifacts are
/// overwritten. Returns the artifact directory.
pub fn write_artifacts(result: &CrawlResult, base_dir: &Path, host: &str) -> Result<PathBuf> {
    let dir = base_dir.join(host);
    fs::create_dir_all(&dir)?;

    write_pretty(&dir.join(HIERARCHY_FILE), &result.hierarchy)?;
    write_pretty(&dir.join(PRODUCTS_FILE), &result.products)?;

    info!(
        "Wrote {} categories and {} products to {}",
        result.hierarchy.node_count(),
        result.products.len(),
        dir.display()
    );
    Ok(dir)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
