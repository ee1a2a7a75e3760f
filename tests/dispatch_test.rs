//! End-to-end dispatch tests over real connections.

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use vhost::config::{parse_config, VhostConfig};

mod common;

fn config() -> VhostConfig {
    let mut config = VhostConfig::default();
    config.vhosts.push(common::site("admin", Some("admin.example.com"), None));
    config.vhosts.push(common::site("tenants", Some("*.example.com"), None));
    config.vhosts.push(common::site("regions", Some("*.*.cdn.net"), None));
    config.vhosts.push(common::site("legacy", None, Some(r"(www\.)?example\.org")));
    config
}

async fn get(addr: std::net::SocketAddr, host: &str) -> reqwest::Response {
    common::client()
        .get(format!("http://{}/some/path", addr))
        .header("host", host)
        .send()
        .await
        .expect("Server unreachable")
}

#[tokio::test]
async fn test_wildcard_site_receives_captures() {
    let server = common::start_server(config()).await;

    let res = get(server.addr, "api.example.com").await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "vhost": "tenants",
            "host": "api.example.com",
            "hostname": "api.example.com",
            "captures": ["api"],
        })
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_port_is_stripped_and_case_ignored() {
    let server = common::start_server(config()).await;

    let body: Value = get(server.addr, "EU.West.CDN.net:8080").await.json().await.unwrap();
    assert_eq!(body["vhost"], "regions");
    assert_eq!(body["host"], "EU.West.CDN.net:8080");
    assert_eq!(body["hostname"], "EU.West.CDN.net");
    assert_eq!(body["captures"], json!(["EU", "West"]));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_first_configured_site_wins() {
    let server = common::start_server(config()).await;

    let body: Value = get(server.addr, "admin.example.com").await.json().await.unwrap();
    assert_eq!(body["vhost"], "admin");
    assert_eq!(body["captures"], json!([]));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_optional_group_reported_as_null() {
    let server = common::start_server(config()).await;

    let body: Value = get(server.addr, "example.org").await.json().await.unwrap();
    assert_eq!(body["vhost"], "legacy");
    assert_eq!(body["captures"], json!([null]));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_host_falls_through() {
    let server = common::start_server(config()).await;

    let res = get(server.addr, "admin.example.com.evil.net").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "No virtual host matched");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_server_from_toml() {
    let config = parse_config(
        r#"
        [[vhosts]]
        name = "docs"
        hostname = "docs.*.io"
        "#,
    )
    .unwrap();
    let server = common::start_server(config).await;

    let body: Value = get(server.addr, "docs.rust.io").await.json().await.unwrap();
    assert_eq!(body["vhost"], "docs");
    assert_eq!(body["captures"], json!(["rust"]));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let server = common::start_server(config()).await;
    server.shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}
