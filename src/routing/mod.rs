//! Host routing subsystem.
//!
//! # Data Flow
//! ```text
//! Pattern Compilation (once per vhost):
//!     HostnameSpec (literal or regex source)
//!     → pattern.rs (escape, expand wildcards, anchor)
//!     → HostPattern (immutable, case-insensitive)
//!
//! Incoming Request (Host header):
//!     → matcher.rs (strip port, run HostPattern)
//!     → Return: VhostData or no match
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at construction, immutable at runtime
//! - One anchored match attempt per request
//! - A mismatch is routine: no errors on the request path

pub mod matcher;
pub mod pattern;

pub use matcher::{hostname_of, match_host, vhost_of, VhostData};
pub use pattern::{HostPattern, HostnameSpec};
