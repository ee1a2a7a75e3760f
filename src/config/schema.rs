//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the vhost server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::error::VhostError;
use crate::routing::HostnameSpec;

/// Root configuration for the vhost server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VhostConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Virtual hosts, checked in order (first match wins).
    pub vhosts: Vec<SiteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// A single virtual host.
///
/// Exactly one of `hostname` and `pattern` must be set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Site identifier for logging and responses.
    pub name: String,

    /// Literal hostname; `*` captures one label (e.g. "*.example.com").
    pub hostname: Option<String>,

    /// Regex source, used verbatim and anchored.
    pub pattern: Option<String>,
}

impl SiteConfig {
    /// The hostname spec; exactly one of `hostname`/`pattern` must be set.
    pub fn spec(&self) -> Result<HostnameSpec, VhostError> {
        match (&self.hostname, &self.pattern) {
            (Some(hostname), None) => Ok(HostnameSpec::literal(hostname.as_str())),
            (None, Some(pattern)) => Ok(HostnameSpec::pattern(pattern.as_str())),
            (None, None) => Err(VhostError::MissingArgument("hostname")),
            (Some(_), Some(_)) => Err(VhostError::InvalidArgument {
                argument: "hostname",
                message: format!("site '{}' sets both hostname and pattern", self.name),
            }),
        }
    }
}
