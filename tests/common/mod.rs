//! Shared utilities for integration testing.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use vhost::config::{SiteConfig, VhostConfig};
use vhost::{Shutdown, VhostServer};

/// Build a site entry.
pub fn site(name: &str, hostname: Option<&str>, pattern: Option<&str>) -> SiteConfig {
    SiteConfig {
        name: name.into(),
        hostname: hostname.map(Into::into),
        pattern: pattern.map(Into::into),
    }
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

/// Start a server for `config` on 127.0.0.1 with an OS-assigned port.
pub async fn start_server(mut config: VhostConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".into();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = VhostServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Client that never reuses connections between requests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
