//! Vhost middleware.
//! Dispatches requests whose Host header matches a pattern to a dedicated handler.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, VhostError};
use crate::routing::{vhost_of, HostPattern, HostnameSpec};

type BoxedHandler = Arc<dyn Fn(Request<Body>, Next) -> BoxFuture<'static, Response> + Send + Sync>;

/// A compiled vhost: host pattern plus the handler for matching requests.
///
/// Use with [`axum::middleware::from_fn_with_state`] and [`vhost_middleware`]:
///
/// ```no_run
/// use axum::{middleware::from_fn_with_state, routing::get, Router};
/// use vhost::http::middleware::{vhost_middleware, Vhost};
///
/// let api = Vhost::new("*.example.com", |_req, _next| async { "api" }).unwrap();
/// let app: Router = Router::new()
///     .route("/", get(|| async { "default" }))
///     .layer(from_fn_with_state(api, vhost_middleware));
/// ```
#[derive(Clone)]
pub struct Vhost {
    pattern: Arc<HostPattern>,
    handler: BoxedHandler,
}

impl Vhost {
    /// Compile `hostname` and pair it with `handler`.
    ///
    /// The handler receives the annotated request and the chain's `Next`.
    pub fn new<H, Fut>(hostname: impl Into<HostnameSpec>, handler: H) -> Result<Self>
    where
        H: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: IntoResponse,
    {
        Self::builder().hostname(hostname).handler(handler).build()
    }

    pub fn builder() -> VhostBuilder {
        VhostBuilder::default()
    }

    pub fn pattern(&self) -> &HostPattern {
        &self.pattern
    }

    /// Run the handler on a host match, otherwise continue the chain.
    pub async fn dispatch(&self, mut req: Request<Body>, next: Next) -> Response {
        let Some(data) = vhost_of(req.headers(), &self.pattern) else {
            debug!(pattern = %self.pattern, "No vhost match, passing through");
            return next.run(req).await;
        };

        debug!(
            pattern = %self.pattern,
            host = %data.host(),
            hostname = %data.hostname(),
            captures = ?data.captures(),
            "Vhost matched"
        );

        req.extensions_mut().insert(data);
        (self.handler)(req, next).await
    }
}

impl fmt::Debug for Vhost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vhost")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Vhost`]; reports missing arguments instead of panicking.
#[derive(Default)]
pub struct VhostBuilder {
    hostname: Option<HostnameSpec>,
    handler: Option<BoxedHandler>,
}

impl VhostBuilder {
    pub fn hostname(mut self, hostname: impl Into<HostnameSpec>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn handler<H, Fut>(mut self, handler: H) -> Self
    where
        H: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: IntoResponse,
    {
        let boxed: BoxedHandler = Arc::new(move |req: Request<Body>, next: Next| {
            let fut = handler(req, next);
            async move { fut.await.into_response() }.boxed()
        });
        self.handler = Some(boxed);
        self
    }

    /// Compile the hostname pattern.
    pub fn build(self) -> Result<Vhost> {
        let hostname = self
            .hostname
            .filter(|h| !h.is_empty())
            .ok_or(VhostError::MissingArgument("hostname"))?;
        let handler = self.handler.ok_or(VhostError::MissingArgument("handle"))?;

        let pattern = HostPattern::compile(&hostname)?;

        Ok(Vhost {
            pattern: Arc::new(pattern),
            handler,
        })
    }
}

/// Axum adapter for [`Vhost::dispatch`].
pub async fn vhost_middleware(
    State(vhost): State<Vhost>,
    req: Request<Body>,
    next: Next,
) -> Response {
    vhost.dispatch(req, next).await
}
