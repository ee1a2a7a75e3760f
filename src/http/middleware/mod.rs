//! Request middleware.
//!
//! - vhost.rs: `from_fn` middleware, handler gets `(Request, Next)`
//! - layer.rs: tower `Layer`, handler is any service (e.g. a per-site `Router`)

pub mod layer;
pub mod vhost;

pub use layer::{VhostLayer, VhostService};
pub use vhost::{vhost_middleware, Vhost, VhostBuilder};
