//! Runs the `scrape` binary against mock shops

use crate::fixtures::mount_shop;
use std::io::Write;
use std::path::Path;
use std::process::Output;
use tempfile::{NamedTempFile, TempDir};
use tokio::process::Command;
use wiremock::MockServer;

async fn run_scrape(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scrape"))
        .args(args)
        .output()
        .await
        .expect("failed to run scrape binary")
}

fn config_file(site_url: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[crawler]
max-concurrent-sessions = 2
navigation-timeout-ms = 5000

[[site]]
url = "{site_url}"
extractor = "woocommerce"
"#
    )
    .unwrap();
    file.flush().unwrap();
    file
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[tokio::test]
async fn test_missing_url_exits_with_failure() {
    let output = run_scrape(&[]).await;
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_unsupported_url_exits_with_failure() {
    let out_dir = TempDir::new().unwrap();
    let output = run_scrape(&[
        "https://unknown-shop.test",
        "--output-dir",
        path_arg(out_dir.path()),
        "-q",
    ])
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(!out_dir.path().join("unknown-shop.test").exists());
}

#[tokio::test]
async fn test_invalid_config_exits_with_failure() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, "[crawler]\nmax-concurrent-sessions = 0\n").unwrap();

    let output = run_scrape(&[
        "https://demo-shop.natek.eu",
        "--config",
        path_arg(config.path()),
    ])
    .await;
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_successful_scrape_writes_artifacts() {
    let server = MockServer::start().await;
    mount_shop(&server).await;
    let uri = server.uri();
    let config = config_file(&uri);
    let out_dir = TempDir::new().unwrap();

    let output = run_scrape(&[
        uri.as_str(),
        "--config",
        path_arg(config.path()),
        "--output-dir",
        path_arg(out_dir.path()),
    ])
    .await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let host_dir = out_dir.path().join("127.0.0.1");
    assert!(host_dir.join("hierarchy.json").is_file());
    assert!(host_dir.join("products.json").is_file());
}

#[tokio::test]
async fn test_failed_scrape_writes_nothing() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let config = config_file(&uri);
    let out_dir = TempDir::new().unwrap();

    // Nothing mounted: the entry page is a 404
    let output = run_scrape(&[
        uri.as_str(),
        "--config",
        path_arg(config.path()),
        "--output-dir",
        path_arg(out_dir.path()),
    ])
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(!out_dir.path().join("127.0.0.1").exists());
}
