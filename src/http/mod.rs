//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → middleware/ (one vhost per configured site, first match wins)
//!     → matched: site handler (JSON match description)
//!     → unmatched: 404 fallback
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{vhost_middleware, Vhost, VhostLayer};
pub use server::{SiteMatch, VhostServer};
