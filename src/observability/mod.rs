//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: host, hostname, captures)
//!     → tower-http TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs (fmt subscriber, stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
