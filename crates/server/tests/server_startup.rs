//! Startup tests that spawn the real binary.

use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use tempfile::NamedTempFile;
use tokio::time::{sleep, timeout};

const MIRROR_LIST: &str = r#"{
    'video': ['https://v1.example', 'https://v2.example'],
    'playlist': ['https://p1.example'],
    'search': ['https://s1.example'],
    'channel': ['https://c1.example'],
    'comments': ['https://c1.example'],
}"#;

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config
fn minimal_config(port: u16, source_url: &str) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[mirrors]
source_url = "{}"
"#,
        port, source_url
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_mirrortube"))
        .env("MIRRORTUBE_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_server_starts_with_remote_mirror_list() {
    let mut source = mockito::Server::new_async().await;
    let list_mock = source
        .mock("GET", "/mirrors")
        .with_status(200)
        .with_body(MIRROR_LIST)
        .create_async()
        .await;

    let port = get_available_port();
    let config = write_config(&minimal_config(port, &format!("{}/mirrors", source.url())));
    let mut server = spawn_server(config.path());

    assert!(
        wait_for_server(port, 60).await,
        "Server did not start in time"
    );
    list_mock.assert_async().await;

    let client = Client::new();
    let info: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/info", port))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(
        info["mirrors"]["video"],
        serde_json::json!(["https://v1.example", "https://v2.example"])
    );
    assert_eq!(info["strict_media_check"], false);

    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_exits_non_zero() {
    let mut server = tokio::process::Command::new(env!("CARGO_BIN_EXE_mirrortube"))
        .env("MIRRORTUBE_CONFIG", "/nonexistent/mirrortube.toml")
        .env("RUST_LOG", "error")
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server");

    let status = timeout(Duration::from_secs(10), server.wait())
        .await
        .expect("Server did not exit")
        .unwrap();
    assert!(!status.success());
}

#[tokio::test]
async fn test_unreachable_mirror_source_exits_non_zero() {
    let port = get_available_port();
    let config = write_config(&minimal_config(port, "http://127.0.0.1:1/mirrors"));
    let mut server = spawn_server(config.path());

    let status = timeout(Duration::from_secs(10), server.wait())
        .await
        .expect("Server did not exit")
        .unwrap();
    assert!(!status.success());
}

#[tokio::test]
async fn test_malformed_mirror_list_exits_non_zero() {
    let mut source = mockito::Server::new_async().await;
    let _mock = source
        .mock("GET", "/mirrors")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let port = get_available_port();
    let config = write_config(&minimal_config(port, &format!("{}/mirrors", source.url())));
    let mut server = spawn_server(config.path());

    let status = timeout(Duration::from_secs(10), server.wait())
        .await
        .expect("Server did not exit")
        .unwrap();
    assert!(!status.success());
}
