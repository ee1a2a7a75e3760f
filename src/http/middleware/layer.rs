//! Tower layer form of vhost dispatch.
//!
//! The handler is any service (typically a whole `axum::Router` for one
//! site); the wrapped inner service is what runs when the host does not match.

use axum::http::Request;
use futures_util::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};
use tracing::debug;

use crate::error::VhostError;
use crate::routing::{vhost_of, HostPattern, HostnameSpec};

/// Layer that routes host-matching requests to `handler`.
#[derive(Debug, Clone)]
pub struct VhostLayer<H> {
    pattern: Arc<HostPattern>,
    handler: H,
}

impl<H> VhostLayer<H> {
    pub fn new(hostname: impl Into<HostnameSpec>, handler: H) -> Result<Self, VhostError> {
        let hostname = hostname.into();
        if hostname.is_empty() {
            return Err(VhostError::MissingArgument("hostname"));
        }

        Ok(Self {
            pattern: Arc::new(HostPattern::compile(&hostname)?),
            handler,
        })
    }
}

impl<S, H: Clone> Layer<S> for VhostLayer<H> {
    type Service = VhostService<S, H>;

    fn layer(&self, inner: S) -> Self::Service {
        VhostService {
            inner,
            handler: self.handler.clone(),
            pattern: self.pattern.clone(),
        }
    }
}

/// Service produced by [`VhostLayer`].
#[derive(Debug, Clone)]
pub struct VhostService<S, H> {
    inner: S,
    handler: H,
    pattern: Arc<HostPattern>,
}

impl<S, H, B> Service<Request<B>> for VhostService<S, H>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send,
    H: Service<Request<B>, Response = S::Response, Error = S::Error> + Clone + Send + 'static,
    H::Future: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    // Readiness is driven per call by `oneshot` on whichever service is picked.
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        match vhost_of(req.headers(), &self.pattern) {
            Some(data) => {
                debug!(pattern = %self.pattern, host = %data.host(), "Vhost matched");
                req.extensions_mut().insert(data);
                self.handler.clone().oneshot(req).boxed()
            }
            None => self.inner.clone().oneshot(req).boxed(),
        }
    }
}
