//! Virtual-host dispatch for axum/tower.
//!
//! Matches the `Host` header of each request against a hostname pattern
//! (`"*.example.com"` or a regex source), annotates matching requests with
//! [`VhostData`] and hands them to a dedicated handler; everything else
//! continues down the chain.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::VhostConfig;
pub use error::VhostError;
pub use http::{vhost_middleware, Vhost, VhostLayer, VhostServer};
pub use lifecycle::Shutdown;
pub use routing::{HostPattern, HostnameSpec, VhostData};
