//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compile one vhost per configured site
//! - Create Axum Router with the vhost chain and a 404 fallback
//! - Wire up middleware (tracing, timeout)
//! - Bind server to listener with graceful shutdown

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{validate_config, SiteConfig, VhostConfig};
use crate::error::VhostError;
use crate::http::middleware::{vhost_middleware, Vhost};
use crate::routing::{match_host, VhostData};

/// Body returned when no configured site matches.
pub const NO_VHOST_BODY: &str = "No virtual host matched";

/// A configured site with its compiled vhost.
#[derive(Debug, Clone)]
struct Site {
    name: Arc<str>,
    vhost: Vhost,
}

impl Site {
    fn from_config(config: &SiteConfig) -> Result<Self, VhostError> {
        let spec = config.spec()?;
        let name: Arc<str> = Arc::from(config.name.as_str());
        let handler_name = name.clone();
        let vhost = Vhost::new(spec, move |req: Request<Body>, _next: Next| {
            let name = handler_name.clone();
            async move { site_response(&name, &req) }
        })?;

        tracing::debug!(site = %name, pattern = %vhost.pattern(), "Compiled vhost");
        Ok(Self { name, vhost })
    }
}

/// JSON description of a host match, as answered by the server.
#[derive(Debug, Serialize)]
pub struct SiteMatch<'a> {
    pub vhost: &'a str,
    #[serde(flatten)]
    pub data: &'a VhostData,
}

fn site_response(name: &str, req: &Request<Body>) -> Response {
    match req.extensions().get::<VhostData>() {
        Some(data) => Json(SiteMatch { vhost: name, data }).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn no_vhost() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NO_VHOST_BODY)
}

/// HTTP server dispatching on the Host header.
pub struct VhostServer {
    router: Router,
    config: VhostConfig,
    sites: Vec<Site>,
}

impl VhostServer {
    /// Create a new server, validating the config and compiling every site.
    pub fn new(config: VhostConfig) -> Result<Self, VhostError> {
        validate_config(&config).map_err(|errors| VhostError::InvalidArgument {
            argument: "config",
            message: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })?;

        let sites = config
            .vhosts
            .iter()
            .map(Site::from_config)
            .collect::<Result<Vec<_>, _>>()?;

        let router = Self::build_router(&config, &sites);
        Ok(Self {
            router,
            config,
            sites,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &VhostConfig, sites: &[Site]) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(no_vhost))
            .route("/", any(no_vhost));

        // The last layer added runs first, so add in reverse to keep config order.
        for site in sites.iter().rev() {
            router = router.layer(from_fn_with_state(site.vhost.clone(), vhost_middleware));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Find the first site matching a raw Host header value.
    pub fn resolve(&self, host: &str) -> Option<(&str, VhostData)> {
        self.sites
            .iter()
            .find_map(|site| match_host(host, site.vhost.pattern()).map(|data| (&*site.name, data)))
    }

    /// A clone of the router, for serving or testing without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &VhostConfig {
        &self.config
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            sites = self.sites.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    fn site(name: &str, hostname: Option<&str>, pattern: Option<&str>) -> SiteConfig {
        SiteConfig {
            name: name.into(),
            hostname: hostname.map(Into::into),
            pattern: pattern.map(Into::into),
        }
    }

    fn server() -> VhostServer {
        let mut config = VhostConfig::default();
        config.vhosts.push(site("admin", Some("admin.example.com"), None));
        config.vhosts.push(site("tenants", Some("*.example.com"), None));
        config.vhosts.push(site("legacy", None, Some(r"(www\.)?example\.org")));
        VhostServer::new(config).unwrap()
    }

    async fn get(router: Router, host: &str, path: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .uri(path)
            .header("host", host)
            .body(Body::empty())
            .unwrap();
        let res = router.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let server = server();

        let (name, data) = server.resolve("admin.example.com").unwrap();
        assert_eq!(name, "admin");
        assert!(data.is_empty());

        let (name, data) = server.resolve("shop.example.com:8443").unwrap();
        assert_eq!(name, "tenants");
        assert_eq!(data.get(0), Some("shop"));

        let (name, data) = server.resolve("example.org").unwrap();
        assert_eq!(name, "legacy");
        assert_eq!(data.captures(), &[None]);

        assert!(server.resolve("example.net").is_none());
    }

    #[tokio::test]
    async fn test_router_answers_matched_site() {
        let (status, body) = get(server().router(), "api.example.com", "/any/path").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "vhost": "tenants",
                "host": "api.example.com",
                "hostname": "api.example.com",
                "captures": ["api"],
            })
        );
    }

    #[tokio::test]
    async fn test_router_config_order() {
        let (_, body) = get(server().router(), "ADMIN.example.com", "/").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["vhost"], "admin");
    }

    #[tokio::test]
    async fn test_router_no_match() {
        let (status, body) = get(server().router(), "unknown.net", "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, NO_VHOST_BODY);
    }

    #[test]
    fn test_site_requires_one_spec() {
        let mut config = VhostConfig::default();
        config.vhosts.push(site("broken", None, None));
        let err = VhostServer::new(config).err().unwrap();
        assert!(matches!(err, VhostError::InvalidArgument { argument: "config", .. }));

        let mut config = VhostConfig::default();
        config.vhosts.push(site("broken", Some("a.com"), Some("a")));
        let err = VhostServer::new(config).err().unwrap();
        assert!(matches!(err, VhostError::InvalidArgument { argument: "config", .. }));
    }

    #[test]
    fn test_new_validates_config() {
        let mut config = VhostConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.vhosts.push(site("dup", Some("a.com"), None));
        config.vhosts.push(site("dup", Some("b.com"), None));

        match VhostServer::new(config).err().unwrap() {
            VhostError::InvalidArgument { argument, message } => {
                assert_eq!(argument, "config");
                assert!(message.contains("listener.bind_address"), "got: {}", message);
                assert!(message.contains("timeouts.request_secs"), "got: {}", message);
                assert!(message.contains("duplicate site name 'dup'"), "got: {}", message);
            }
            other => panic!("expected InvalidArgument, got {}", other),
        }
    }

    #[test]
    fn test_config_accessor() {
        let server = server();
        assert_eq!(server.config().vhosts.len(), 3);
        assert_eq!(server.config().vhosts[0].name, "admin");
    }

    #[test]
    fn test_site_match_shape() {
        let server = server();
        let (name, data) = server.resolve("shop.example.com:8443").unwrap();
        let json = serde_json::to_value(SiteMatch { vhost: name, data: &data }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "vhost": "tenants",
                "host": "shop.example.com:8443",
                "hostname": "shop.example.com",
                "captures": ["shop"],
            })
        );
    }
}
